//! Recommendation Client: submits a normalized assessment to the guidance
//! endpoint and returns the parsed recommendation.

use tracing::info;

use crate::api_client::{ApiClient, ApiError, Envelope};
use crate::assessment::GuidanceRequest;
use crate::career::models::RecommendationResult;

pub const GUIDANCE_PATH: &str = "career/career-guidance";

/// One attempt, no retry. Failures are returned as-is for the call site's
/// policy to handle.
pub async fn submit(
    api: &ApiClient,
    request: &GuidanceRequest,
) -> Result<RecommendationResult, ApiError> {
    info!(
        "Requesting career guidance ({} skills, {} interests)",
        request.skills.len(),
        request.interests.len()
    );

    let envelope: Envelope<RecommendationResult> = api.post_json(GUIDANCE_PATH, request).await?;
    let result = envelope.into_data()?.normalized();

    if result.recommended_career.is_empty() {
        return Err(ApiError::Rejected(
            "Guidance response did not name a career".to_string(),
        ));
    }

    info!(
        "Guidance recommends '{}' ({:.0}%)",
        result.recommended_career, result.confidence_score
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::test_support::{dead_upstream, spawn_upstream};
    use crate::storage::MemoryStore;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::time::Duration;

    fn request() -> GuidanceRequest {
        GuidanceRequest {
            skills: vec!["Python (Level: 4/5)".to_string()],
            interests: vec!["Data".to_string()],
            academics: "CGPA: 8.2".to_string(),
            goals: "Looking for a role in technology".to_string(),
            experience: "Fresher".to_string(),
        }
    }

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5), Arc::new(MemoryStore::new())).unwrap()
    }

    #[tokio::test]
    async fn test_submit_sends_normalized_body_and_parses_result() {
        let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let captured = seen.clone();
        let router = Router::new().route(
            "/career/career-guidance",
            post(move |Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = Some(body);
                    Json(json!({
                        "success": true,
                        "data": {
                            "recommendedCareer": " Data Analyst ",
                            "confidenceScore": 77,
                            "prioritySkills": ["SQL", "Excel"]
                        }
                    }))
                }
            }),
        );
        let base = spawn_upstream(router).await;

        let result = submit(&client(&base), &request()).await.unwrap();
        assert_eq!(result.recommended_career, "Data Analyst");
        assert_eq!(result.confidence_score, 77.0);

        let body = seen.lock().unwrap().clone().unwrap();
        assert_eq!(body["skills"], json!(["Python (Level: 4/5)"]));
        assert_eq!(body["interests"], json!(["Data"]));
        assert_eq!(body["academics"], "CGPA: 8.2");
    }

    #[tokio::test]
    async fn test_submit_surfaces_server_message() {
        let router = Router::new().route(
            "/career/career-guidance",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"success": false, "error": "Skills array is required and cannot be empty"})),
                )
            }),
        );
        let base = spawn_upstream(router).await;

        let err = submit(&client(&base), &request()).await.unwrap_err();
        assert_eq!(
            err.user_message(),
            "Skills array is required and cannot be empty"
        );
    }

    #[tokio::test]
    async fn test_submit_success_false_in_2xx_is_error() {
        let router = Router::new().route(
            "/career/career-guidance",
            post(|| async { Json(json!({"success": false, "error": "Analysis failed"})) }),
        );
        let base = spawn_upstream(router).await;

        let err = submit(&client(&base), &request()).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(ref m) if m == "Analysis failed"));
    }

    #[tokio::test]
    async fn test_submit_unreachable_is_transport_error() {
        let base = dead_upstream().await;
        let err = submit(&client(&base), &request()).await.unwrap_err();
        assert!(err.is_transport());
    }
}
