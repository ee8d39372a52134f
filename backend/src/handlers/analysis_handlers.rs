use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::api::pipedrive::{create_lead, CrmClient};
use crate::api::resend_email::{EmailClient, ReportEmail};
use crate::error::AnalysisError;
use crate::models::analysis_models::{AnalysisData, AnalysisResponse};
use crate::utils::metrics::calculate_metrics;
use crate::AppState;

/// Metrics, then CRM person and deal, then the report email. The first
/// failure aborts what is left; nothing already created is rolled back.
pub async fn run_analysis(
    crm: &dyn CrmClient,
    email: &dyn EmailClient,
    email_from: &str,
    booking_url: &str,
    data: &AnalysisData,
) -> Result<AnalysisResponse, AnalysisError> {
    let metrics = calculate_metrics(data);
    tracing::debug!("Metrics computed: {:?}", metrics);

    let lead = create_lead(crm, data, &metrics).await?;

    let report = ReportEmail::for_analysis(email_from, booking_url, data, &metrics);
    let email_id = email.send(&report).await?;

    Ok(AnalysisResponse {
        success: true,
        metrics: Some(metrics),
        pipedrive_contact_id: Some(lead.contact_id),
        pipedrive_deal_id: Some(lead.deal_id),
        email_id: Some(email_id),
        error: None,
        details: None,
    })
}

// Not idempotent: every call creates a new person, a new deal and a new email.
// Every failure, an unreadable body included, goes out as the same 500
// envelope. Missing analytic answers are not failures; their scores are null.
pub async fn process_analysis(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalysisData>, JsonRejection>,
) -> (StatusCode, Json<AnalysisResponse>) {
    let Json(data) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::error!("Unreadable analysis payload: {}", rejection.body_text());
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AnalysisResponse::failure(rejection.body_text(), format!("{:?}", rejection))),
            );
        }
    };

    tracing::info!("Processing analysis for {}", data.contact.email);

    match run_analysis(
        state.crm.as_ref(),
        state.email.as_ref(),
        &state.email_from,
        &state.booking_url,
        &data,
    )
    .await
    {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => {
            tracing::error!("process-analysis failed for {}: {}", data.contact.email, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AnalysisResponse::failure(e.to_string(), format!("{:?}", e))),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::pipedrive::MockCrmClient;
    use crate::api::resend_email::MockEmailClient;
    use crate::build_router;
    use crate::utils::metrics::tests::sample_data;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn state(crm: MockCrmClient, email: MockEmailClient) -> Arc<AppState> {
        Arc::new(AppState {
            crm: Arc::new(crm),
            email: Arc::new(email),
            email_from: "Little John <analysis@littlejohn.fr>".to_string(),
            booking_url: "https://calendly.com/little-john".to_string(),
        })
    }

    fn happy_crm() -> MockCrmClient {
        let mut crm = MockCrmClient::new();
        crm.expect_create_person().times(1).returning(|_| Ok(11));
        crm.expect_create_deal().times(1).returning(|_| Ok(22));
        crm
    }

    async fn post_json(app: axum::Router, body: String) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/process-analysis")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn successful_run_reports_all_ids() {
        let mut email = MockEmailClient::new();
        email
            .expect_send()
            .withf(|e| e.to == "marie@cabinet.fr" && e.html.contains("Marie Durand"))
            .times(1)
            .returning(|_| Ok("em_123".to_string()));

        let app = build_router(state(happy_crm(), email));
        let body = serde_json::to_string(&sample_data()).unwrap();
        let (status, json) = post_json(app, body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["pipedriveContactId"], 11);
        assert_eq!(json["pipedriveDealId"], 22);
        assert_eq!(json["emailId"], "em_123");
        assert_eq!(json["metrics"]["digitalMaturityScore"], 45);
        assert_eq!(json["metrics"]["recommendations"].as_array().unwrap().len(), 5);
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn crm_rejection_short_circuits_email() {
        let mut crm = MockCrmClient::new();
        crm.expect_create_person()
            .returning(|_| Err(AnalysisError::PersonRejected("Invalid api_token".to_string())));
        crm.expect_create_deal().never();
        let mut email = MockEmailClient::new();
        email.expect_send().never();

        let app = build_router(state(crm, email));
        let (status, json) = post_json(app, serde_json::to_string(&sample_data()).unwrap()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Erreur création contact: Invalid api_token");
        assert!(json.get("metrics").is_none());
    }

    #[tokio::test]
    async fn email_failure_is_reported_after_crm_records_exist() {
        let mut email = MockEmailClient::new();
        email
            .expect_send()
            .times(1)
            .returning(|_| Err(AnalysisError::EmailRejected("domain not verified".to_string())));

        let data = sample_data();
        let crm = happy_crm();
        let err = run_analysis(&crm, &email, "from@test", "https://book.test", &data)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Erreur envoi email: domain not verified");
    }

    #[tokio::test]
    async fn malformed_body_gets_failure_envelope() {
        let mut crm = MockCrmClient::new();
        crm.expect_create_person().never();
        let mut email = MockEmailClient::new();
        email.expect_send().never();

        let app = build_router(state(crm, email));
        let (status, json) = post_json(app, r#"{"averagePremium": 15000"#.to_string()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert!(!json["error"].as_str().unwrap().is_empty());
        assert!(json.get("details").is_some());
    }

    #[tokio::test]
    async fn body_without_contact_block_gets_failure_envelope() {
        let mut crm = MockCrmClient::new();
        crm.expect_create_person().never();
        let mut email = MockEmailClient::new();
        email.expect_send().never();

        let app = build_router(state(crm, email));
        let (status, json) = post_json(app, r#"{"averagePremium": 15000}"#.to_string()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn questionnaire_without_maturity_levels_still_reaches_crm_and_email() {
        let mut crm = MockCrmClient::new();
        crm.expect_create_person()
            .withf(|person| person.custom_fields["average_premium"] == 15000.0)
            .times(1)
            .returning(|_| Ok(5));
        crm.expect_create_deal()
            .withf(|deal| deal.person_id == 5 && deal.value == Some(27000 * 12))
            .times(1)
            .returning(|_| Ok(6));
        let mut email = MockEmailClient::new();
        email
            .expect_send()
            .withf(|e| e.html.contains("NaN/100"))
            .times(1)
            .returning(|_| Ok("em_9".to_string()));

        // step 1 and step 2 exactly as the shipped questionnaire stores them
        let body = r#"{
            "extranetsCount": 4, "collectParc": 0.5, "collectRI": 1, "saisieExtranet": 0.5,
            "contractsPerMonth": 15, "averagePremium": 15000, "conversionRate": 60,
            "employeeCount": "6-20",
            "contact": {"firstName": "Marie", "lastName": "Durand", "email": "marie@cabinet.fr", "company": "Cabinet Durand"},
            "timestamp": "2026-10-18T09:30:00.000Z"
        }"#;
        let app = build_router(state(crm, email));
        let (status, json) = post_json(app, body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["pipedriveDealId"], 6);
        assert!(json["metrics"]["digitalMaturityScore"].is_null());
        assert!(json["metrics"]["overallOptimizationScore"].is_null());
        assert_eq!(json["metrics"]["additionalRevenueOpportunity"], 27000);
    }

    #[tokio::test]
    async fn repeated_submissions_create_duplicate_records() {
        let mut crm = MockCrmClient::new();
        crm.expect_create_person().times(2).returning(|_| Ok(1));
        crm.expect_create_deal().times(2).returning(|_| Ok(2));
        let mut email = MockEmailClient::new();
        email.expect_send().times(2).returning(|_| Ok("em".to_string()));

        let data = sample_data();
        for _ in 0..2 {
            run_analysis(&crm, &email, "from@test", "https://book.test", &data)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn preflight_is_answered_with_cors_headers() {
        let app = build_router(state(MockCrmClient::new(), MockEmailClient::new()));
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/process-analysis")
                    .header(header::ORIGIN, "https://littlejohn.fr")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,apikey")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn health_check_answers_ok() {
        let app = build_router(state(MockCrmClient::new(), MockEmailClient::new()));
        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"OK");
    }
}
