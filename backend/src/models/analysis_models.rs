use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Numbers arrive from browser form state. Anything that isn't a number (or
/// a numeric string) reads as absent and turns into NaN downstream.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ContactDetails {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Merged questionnaire payload posted by the contact screen. Only the
/// `contact` block is mandatory; analytic fields may be missing.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisData {
    // step 1
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub digitalization_level: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub automation_level: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub process_efficiency: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub extranets_count: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub collect_parc: Option<f64>,
    #[serde(
        default,
        rename = "collectRI",
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub collect_ri: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub saisie_extranet: Option<f64>,

    // step 2
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub contracts_per_month: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub average_premium: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub conversion_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub employee_count: String,

    pub contact: ContactDetails,
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: String,
}

/// Scores are `None` when an input was missing (NaN upstream) and
/// serialize as `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedMetrics {
    pub digital_maturity_score: Option<i64>,
    pub time_efficiency_score: Option<i64>,
    pub potential_monthly_savings: Option<i64>,
    pub additional_revenue_opportunity: Option<i64>,
    pub overall_optimization_score: Option<i64>,
    pub recommendations: Vec<String>,
}

/// Envelope returned by the process-analysis endpoint.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<CalculatedMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipedrive_contact_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipedrive_deal_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AnalysisResponse {
    pub fn failure(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            success: false,
            metrics: None,
            pipedrive_contact_id: None,
            pipedrive_deal_id: None,
            email_id: None,
            error: Some(error.into()),
            details: Some(details.into()),
        }
    }
}

/// Ids handed back by the CRM once the person and its deal exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrmLead {
    pub contact_id: i64,
    pub deal_id: i64,
}
