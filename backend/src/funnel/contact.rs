use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::session::{clear_steps, load_step, SessionStore, STEP1_KEY, STEP2_KEY};
use crate::error::FunnelError;
use crate::models::analysis_models::AnalysisResponse;

pub const SUCCESS_MESSAGE: &str = "Votre analyse a été envoyée par email et votre profil créé.";
pub const GENERIC_FAILURE: &str = "Une erreur est survenue lors du traitement de votre demande.";
pub const PROCESSING_FAILURE: &str = "Erreur lors du traitement";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), FunnelError> {
        let missing: Vec<&'static str> = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("company", &self.company),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(FunnelError::MissingContactFields(missing))
        }
    }
}

/// Payload for the process-analysis call: both steps merged (step 2 wins on
/// collisions), the contact block and an ISO-8601 timestamp.
pub fn build_submission<S>(
    store: &S,
    contact: &ContactForm,
    now: DateTime<Utc>,
) -> Result<Value, FunnelError>
where
    S: SessionStore + ?Sized,
{
    contact.validate()?;

    let mut payload: Map<String, Value> = load_step(store, STEP1_KEY)?;
    payload.extend(load_step(store, STEP2_KEY)?);
    payload.insert(
        "contact".to_string(),
        serde_json::to_value(contact).map_err(|e| FunnelError::Serialization(e.to_string()))?,
    );
    payload.insert(
        "timestamp".to_string(),
        Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    Ok(Value::Object(payload))
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Sent { toast: String },
    Failed { toast: String },
}

/// Turns the backend envelope into a toast. The stored steps are dropped
/// only once the backend reports success.
pub fn complete_submission<S>(store: &mut S, response: &AnalysisResponse) -> SubmissionOutcome
where
    S: SessionStore + ?Sized,
{
    if response.success {
        clear_steps(store);
        SubmissionOutcome::Sent { toast: SUCCESS_MESSAGE.to_string() }
    } else {
        let toast = response
            .error
            .clone()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| PROCESSING_FAILURE.to_string());
        SubmissionOutcome::Failed { toast }
    }
}

/// A submission that never reached the backend: the form was incomplete or
/// the stored answers could not be read. The steps are kept.
pub fn submission_error(error: &FunnelError) -> SubmissionOutcome {
    SubmissionOutcome::Failed { toast: error.to_string() }
}

/// Transport-level failure (no envelope at all).
pub fn transport_failure(error: Option<&str>) -> SubmissionOutcome {
    SubmissionOutcome::Failed {
        toast: error
            .filter(|e| !e.is_empty())
            .unwrap_or(GENERIC_FAILURE)
            .to_string(),
    }
}
