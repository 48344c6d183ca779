use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Liveness of this service only; upstream health lives under /api/v1/service-health.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "nexus-api"
    }))
}
