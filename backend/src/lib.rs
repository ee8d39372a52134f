use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub mod config;
pub mod error;
pub mod funnel;
pub mod api {
    pub mod pipedrive;
    pub mod resend_email;
}
pub mod handlers {
    pub mod analysis_handlers;
}
pub mod models {
    pub mod analysis_models;
}
pub mod utils {
    pub mod metrics;
    pub mod report;
}

use api::pipedrive::{CrmClient, PipedriveClient};
use api::resend_email::{EmailClient, ResendEmailClient};
use config::AppConfig;
use error::AnalysisError;
use handlers::analysis_handlers;

pub struct AppState {
    pub crm: Arc<dyn CrmClient>,
    pub email: Arc<dyn EmailClient>,
    pub email_from: String,
    pub booking_url: String,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self, AnalysisError> {
        let crm = PipedriveClient::new(
            &config.pipedrive_api_url,
            &config.pipedrive_api_key,
            config.http_timeout,
        )?;

        Ok(Self {
            crm: Arc::new(crm),
            email: Arc::new(ResendEmailClient::new(&config.resend_api_key)),
            email_from: config.email_from.clone(),
            booking_url: config.booking_url.clone(),
        })
    }
}

async fn health_check() -> &'static str {
    "OK"
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/process-analysis", post(analysis_handlers::process_analysis))
        .route("/functions/v1/process-analysis", post(analysis_handlers::process_analysis))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
