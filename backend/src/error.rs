use thiserror::Error;

/// Failures of the analysis pipeline. The display text is what ends up in
/// the `error` field of the JSON envelope, so it stays user readable.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Erreur création contact: {0}")]
    PersonRejected(String),
    #[error("Erreur création deal: {0}")]
    DealRejected(String),
    #[error("Erreur envoi email: {0}")]
    EmailRejected(String),
    #[error("Réponse CRM invalide: {0}")]
    MalformedCrmResponse(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Error, Debug, PartialEq)]
pub enum FunnelError {
    #[error("Veuillez remplir tous les champs obligatoires")]
    MissingContactFields(Vec<&'static str>),
    #[error("Failed to serialize questionnaire step: {0}")]
    Serialization(String),
    #[error("Adresse email invalide")]
    InvalidEmail,
    #[error("Réponses du questionnaire illisibles ({key}): {reason}")]
    CorruptStep { key: String, reason: String },
}
