use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::health::{HealthHandle, HealthStatus};
use crate::state::AppState;

/// GET /api/v1/service-health
pub async fn handle_status(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.health.current())
}

/// POST /api/v1/service-health/retry
pub async fn handle_retry(State(state): State<AppState>) -> Result<Json<HealthStatus>, AppError> {
    let status = state.health.retry().await;
    stopped_if_none(&state.health, status)
}

/// POST /api/v1/service-health/reset
pub async fn handle_reset(State(state): State<AppState>) -> Result<Json<HealthStatus>, AppError> {
    let status = state.health.reset().await;
    stopped_if_none(&state.health, status)
}

fn stopped_if_none(
    handle: &HealthHandle,
    status: Option<HealthStatus>,
) -> Result<Json<HealthStatus>, AppError> {
    match status {
        Some(status) => Ok(Json(status)),
        None => {
            tracing::error!("Health monitor is not running (last status: {:?})", handle.current());
            Err(AppError::Internal(anyhow::anyhow!("health monitor stopped")))
        }
    }
}
