//! Session token handling. The token is stored under `lb_token` and attached
//! as a bearer token to every upstream call made through `ApiClient`.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::TOKEN_KEY;

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub token: String,
}

/// PUT /api/v1/session
pub async fn handle_set_session(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Result<StatusCode, AppError> {
    let token = req.token.trim();
    if token.is_empty() {
        return Err(AppError::Validation("token must not be empty".to_string()));
    }

    state.kv.set(TOKEN_KEY, token).await?;
    info!("Session token stored");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/session
pub async fn handle_clear_session(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.kv.remove(TOKEN_KEY).await?;
    info!("Session token cleared");
    Ok(StatusCode::NO_CONTENT)
}
