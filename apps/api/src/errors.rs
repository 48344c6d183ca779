use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::api_client::ApiError;
use crate::assessment::AssessmentError;
use crate::career::store::StateError;
use crate::interview::InterviewError;
use crate::resume::ResumeValidationError;
use crate::storage::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] ApiError),

    #[error("Career state error: {0}")]
    State(#[from] StateError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AssessmentError> for AppError {
    fn from(e: AssessmentError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<InterviewError> for AppError {
    fn from(e: InterviewError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<ResumeValidationError> for AppError {
    fn from(e: ResumeValidationError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Upstream(e) => upstream_status(e),
            AppError::State(StateError::EmptyCareer) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                StateError::EmptyCareer.to_string(),
            ),
            AppError::State(e) => {
                tracing::error!("Career state error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STATE_ERROR",
                    "Career data could not be saved".to_string(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Client errors from upstream keep their status; server and transport
/// failures become gateway errors. The message is always user-facing.
fn upstream_status(e: &ApiError) -> (StatusCode, &'static str, String) {
    match e {
        ApiError::Api { status, .. } if (400..500).contains(status) => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST),
            "UPSTREAM_REJECTED",
            e.user_message(),
        ),
        ApiError::Api { .. } | ApiError::Rejected(_) => {
            tracing::warn!("Upstream reported failure: {e}");
            (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.user_message())
        }
        ApiError::Timeout | ApiError::Connect(_) => {
            tracing::warn!("Upstream unavailable: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "UPSTREAM_UNAVAILABLE",
                e.user_message(),
            )
        }
        ApiError::Http(_) | ApiError::Parse(_) => {
            tracing::error!("Upstream call failed: {e}");
            (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.user_message())
        }
    }
}
