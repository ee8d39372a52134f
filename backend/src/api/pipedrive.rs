use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AnalysisError;
use crate::models::analysis_models::{AnalysisData, CalculatedMetrics, CrmLead};
use crate::utils::metrics::{js_round, to_score};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PersonEmail {
    pub value: String,
    pub primary: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewPerson {
    pub name: String,
    pub email: Vec<PersonEmail>,
    pub custom_fields: Value,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewDeal {
    pub title: String,
    pub person_id: i64,
    pub status: String,
    /// `null` when the revenue opportunity could not be computed.
    pub value: Option<i64>,
    pub currency: String,
    pub custom_fields: Value,
}

/// `{ success, data: { id }, error }` as returned by Pipedrive v1.
#[derive(Debug, Deserialize)]
pub struct PipedriveEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<PipedriveRecord>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PipedriveRecord {
    pub id: i64,
}

impl NewPerson {
    pub fn from_analysis(data: &AnalysisData) -> Self {
        let mut custom_fields = json!({ "employee_count": data.employee_count });
        // Answers the visitor never gave are left out rather than sent as null.
        let answers = [
            ("contracts_per_month", data.contracts_per_month),
            ("average_premium", data.average_premium),
            ("conversion_rate", data.conversion_rate),
            ("extranets_count", data.extranets_count),
        ];
        for (name, value) in answers {
            if let Some(value) = value {
                custom_fields[name] = json!(value);
            }
        }
        if let Some(company) = data.contact.company.as_deref().filter(|c| !c.is_empty()) {
            custom_fields["company"] = json!(company);
        }

        Self {
            name: data.contact.full_name(),
            email: vec![PersonEmail { value: data.contact.email.clone(), primary: true }],
            custom_fields,
        }
    }
}

impl NewDeal {
    pub fn from_analysis(data: &AnalysisData, metrics: &CalculatedMetrics, person_id: i64) -> Self {
        Self {
            title: format!("Analyse Little John - {}", data.contact.full_name()),
            person_id,
            status: "open".to_string(),
            // yearly value of the revenue opportunity
            value: metrics
                .additional_revenue_opportunity
                .and_then(|monthly| to_score(js_round(monthly as f64 * 12.0))),
            currency: "EUR".to_string(),
            custom_fields: json!({
                "digital_maturity_score": metrics.digital_maturity_score,
                "optimization_score": metrics.overall_optimization_score,
                "monthly_savings": metrics.potential_monthly_savings,
                "revenue_opportunity": metrics.additional_revenue_opportunity,
            }),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CrmClient: Send + Sync {
    async fn create_person(&self, person: &NewPerson) -> Result<i64, AnalysisError>;
    async fn create_deal(&self, deal: &NewDeal) -> Result<i64, AnalysisError>;
}

/// Creates the person, then the deal attached to it. A rejected person
/// stops here and no deal is attempted.
pub async fn create_lead(
    crm: &dyn CrmClient,
    data: &AnalysisData,
    metrics: &CalculatedMetrics,
) -> Result<CrmLead, AnalysisError> {
    let contact_id = crm.create_person(&NewPerson::from_analysis(data)).await?;
    tracing::debug!("Pipedrive person {} created", contact_id);

    let deal_id = crm
        .create_deal(&NewDeal::from_analysis(data, metrics, contact_id))
        .await?;
    tracing::info!("Pipedrive person {} and deal {} created", contact_id, deal_id);

    Ok(CrmLead { contact_id, deal_id })
}

pub struct PipedriveClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl PipedriveClient {
    pub fn new(base_url: &str, api_token: &str, timeout: Duration) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
            tracing::error!("Failed to build Pipedrive HTTP client: {}", e);
            AnalysisError::Http(e)
        })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T: Serialize + Sync>(&self, resource: &str, body: &T) -> Result<PipedriveEnvelope, AnalysisError> {
        let url = format!("{}/{}", self.base_url, resource);
        let response = self
            .client
            .post(&url)
            .query(&[("api_token", self.api_token.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        serde_json::from_str::<PipedriveEnvelope>(&text).map_err(|e| {
            tracing::error!("Unreadable Pipedrive response ({}) on {}: {}", status, resource, e);
            AnalysisError::MalformedCrmResponse(format!("{} ({})", e, status))
        })
    }
}

fn record_id(envelope: PipedriveEnvelope, rejected: fn(String) -> AnalysisError) -> Result<i64, AnalysisError> {
    if !envelope.success {
        return Err(rejected(envelope.error.unwrap_or_else(|| "undefined".to_string())));
    }
    envelope
        .data
        .map(|record| record.id)
        .ok_or_else(|| AnalysisError::MalformedCrmResponse("missing data.id".to_string()))
}

#[async_trait]
impl CrmClient for PipedriveClient {
    async fn create_person(&self, person: &NewPerson) -> Result<i64, AnalysisError> {
        let envelope = self.post("persons", person).await?;
        record_id(envelope, AnalysisError::PersonRejected)
    }

    async fn create_deal(&self, deal: &NewDeal) -> Result<i64, AnalysisError> {
        let envelope = self.post("deals", deal).await?;
        record_id(envelope, AnalysisError::DealRejected)
    }
}
