pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::career::handlers as career;
use crate::guidance::handlers as guidance;
use crate::health::handlers as service_health;
use crate::interview::handlers as interview;
use crate::resume::{handlers as resume, MAX_RESUME_BYTES};
use crate::session;
use crate::state::AppState;
use crate::views::handlers as views;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/service-health",
            get(service_health::handle_status),
        )
        .route(
            "/api/v1/service-health/retry",
            post(service_health::handle_retry),
        )
        .route(
            "/api/v1/service-health/reset",
            post(service_health::handle_reset),
        )
        // Session token
        .route(
            "/api/v1/session",
            put(session::handle_set_session).delete(session::handle_clear_session),
        )
        // Shared career state
        .route(
            "/api/v1/career",
            get(career::handle_get_career)
                .patch(career::handle_update_career)
                .delete(career::handle_clear_career),
        )
        .route("/api/v1/career/analysis", put(career::handle_set_analysis))
        // Assessment and guidance
        .route(
            "/api/v1/assessment/template",
            get(assessment::handle_template),
        )
        .route(
            "/api/v1/assessment/progress",
            post(assessment::handle_progress),
        )
        .route(
            "/api/v1/assessment/submit",
            post(guidance::handle_assessment_submit),
        )
        .route("/api/v1/guidance", post(guidance::handle_guidance_page))
        .route(
            "/api/v1/guidance/journey",
            post(guidance::handle_guidance_journey),
        )
        // Dependent views
        .route("/api/v1/views/roadmap", get(views::handle_roadmap))
        .route(
            "/api/v1/views/roadmap/export",
            get(views::handle_roadmap_export),
        )
        .route(
            "/api/v1/views/interview-prep",
            get(views::handle_interview_prep),
        )
        .route("/api/v1/views/job-match", get(views::handle_job_match))
        .route(
            "/api/v1/views/job-match/risk",
            get(views::handle_career_risk),
        )
        .route(
            "/api/v1/views/learning-path",
            get(views::handle_learning_path),
        )
        // Interview prep
        .route(
            "/api/v1/interview/readiness",
            get(interview::handle_readiness),
        )
        .route(
            "/api/v1/interview/prep-plan",
            post(interview::handle_prep_plan),
        )
        .route(
            "/api/v1/interview/materials",
            get(interview::handle_materials),
        )
        .route(
            "/api/v1/interview/evaluate",
            post(interview::handle_evaluate),
        )
        .route("/api/v1/interview/pdf", get(interview::handle_pdf))
        // Resume analysis; the limit leaves room for multipart framing so
        // oversized files reach local validation.
        .route(
            "/api/v1/resume/analyze",
            post(resume::handle_analyze).layer(DefaultBodyLimit::max(2 * MAX_RESUME_BYTES)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::api_client::test_support::dead_upstream;
    use crate::api_client::ApiClient;
    use crate::career::store::CareerStore;
    use crate::health::HealthMonitor;
    use crate::storage::{KeyValueStore, MemoryStore, TOKEN_KEY};

    async fn test_state() -> (AppState, Arc<dyn KeyValueStore>) {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let base = dead_upstream().await;
        let api = ApiClient::new(&base, Duration::from_secs(2), kv.clone()).unwrap();
        let career = CareerStore::new(kv.clone());
        career.hydrate().await;
        let (health, _task) = HealthMonitor::spawn(api.clone(), Duration::from_secs(3600));

        let state = AppState {
            career,
            kv: kv.clone(),
            api: api.clone(),
            roadmap_api: api,
            health,
        };
        (state, kv)
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.oneshot(request.body(body).unwrap()).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_service_name() {
        let (state, _) = test_state().await;
        let response = send(build_router(state), Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["service"], "nexus-api");
    }

    #[tokio::test]
    async fn test_patch_then_get_career() {
        let (state, _) = test_state().await;
        let app = build_router(state);

        let response = send(
            app.clone(),
            Method::PATCH,
            "/api/v1/career",
            Some(json!({"selectedCareer": "Data Scientist", "experienceLevel": "Fresher"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(send(app, Method::GET, "/api/v1/career", None).await).await;
        assert_eq!(body["selectedCareer"], "Data Scientist");
        assert_eq!(body["experienceLevel"], "Fresher");
    }

    #[tokio::test]
    async fn test_single_field_patch_keeps_other_fields() {
        let (state, _) = test_state().await;
        let app = build_router(state);

        send(
            app.clone(),
            Method::PATCH,
            "/api/v1/career",
            Some(json!({"selectedCareer": "Data Analyst"})),
        )
        .await;
        let response = send(
            app,
            Method::PATCH,
            "/api/v1/career",
            Some(json!({"confidence": 140})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["selectedCareer"], "Data Analyst");
        assert_eq!(body["confidence"], 100.0);
    }

    #[tokio::test]
    async fn test_clear_career_returns_no_content() {
        let (state, _) = test_state().await;
        let response = send(build_router(state), Method::DELETE, "/api/v1/career", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_guidance_rejects_incomplete_assessment_before_upstream() {
        let (state, _) = test_state().await;
        let response = send(
            build_router(state),
            Method::POST,
            "/api/v1/guidance",
            Some(json!({"name": "", "email": "a@b.c"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_roadmap_falls_back_when_service_down() {
        let (state, _) = test_state().await;
        let app = build_router(state);

        let response = send(app.clone(), Method::GET, "/api/v1/views/roadmap", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let first = json_body(response).await;
        assert_eq!(first["source"], "fallback");
        assert_eq!(first["data"]["roadmap"]["career"], "Data Analyst");

        let second = json_body(send(app, Method::GET, "/api/v1/views/roadmap", None).await).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_put_analysis_sets_confidence() {
        let (state, _) = test_state().await;
        let response = send(
            build_router(state),
            Method::PUT,
            "/api/v1/career/analysis",
            Some(json!({"recommendedCareer": "Data Analyst", "confidenceScore": 77})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["selectedCareer"], "Data Analyst");
        assert_eq!(body["confidence"], 77.0);
    }

    #[tokio::test]
    async fn test_session_token_roundtrip() {
        let (state, kv) = test_state().await;
        let app = build_router(state);

        let response = send(
            app.clone(),
            Method::PUT,
            "/api/v1/session",
            Some(json!({"token": "   "})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            app.clone(),
            Method::PUT,
            "/api/v1/session",
            Some(json!({"token": " abc123 "})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(kv.get(TOKEN_KEY).await.unwrap().as_deref(), Some("abc123"));

        let response = send(app, Method::DELETE, "/api/v1/session", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(kv.get(TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_service_health_retry_counts_checks() {
        let (state, _) = test_state().await;
        let response = send(
            build_router(state),
            Method::POST,
            "/api/v1/service-health/retry",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["isHealthy"], false);
        assert_eq!(body["checkCount"], 2);
    }

    #[tokio::test]
    async fn test_career_risk_requires_a_role() {
        let (state, _) = test_state().await;
        let response = send(
            build_router(state),
            Method::GET,
            "/api/v1/views/job-match/risk",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
