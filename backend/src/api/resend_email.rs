use async_trait::async_trait;
use resend_rs::types::CreateEmailBaseOptions;
use resend_rs::Resend;

use crate::error::AnalysisError;
use crate::models::analysis_models::{AnalysisData, CalculatedMetrics};
use crate::utils::report::{render_report_html, report_subject};

#[derive(Debug, Clone, PartialEq)]
pub struct ReportEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl ReportEmail {
    pub fn for_analysis(
        from: &str,
        booking_url: &str,
        data: &AnalysisData,
        metrics: &CalculatedMetrics,
    ) -> Self {
        Self {
            from: from.to_string(),
            to: data.contact.email.clone(),
            subject: report_subject(data),
            html: render_report_html(data, metrics, booking_url),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailClient: Send + Sync {
    /// Sends the message and returns the provider's email id.
    async fn send(&self, email: &ReportEmail) -> Result<String, AnalysisError>;
}

pub struct ResendEmailClient {
    resend: Resend,
}

impl ResendEmailClient {
    pub fn new(api_key: &str) -> Self {
        Self { resend: Resend::new(api_key) }
    }
}

#[async_trait]
impl EmailClient for ResendEmailClient {
    async fn send(&self, email: &ReportEmail) -> Result<String, AnalysisError> {
        let options = CreateEmailBaseOptions::new(&email.from, [email.to.as_str()], &email.subject)
            .with_html(&email.html);

        let response = self.resend.emails.send(options).await.map_err(|e| {
            tracing::error!("Resend rejected report email to {}: {}", email.to, e);
            AnalysisError::EmailRejected(e.to_string())
        })?;

        let id = response.id.to_string();
        tracing::info!("Report email {} sent to {}", id, email.to);
        Ok(id)
    }
}
