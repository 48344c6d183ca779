use std::sync::Arc;

use crate::api_client::ApiClient;
use crate::career::store::CareerStore;
use crate::health::HealthHandle;
use crate::storage::KeyValueStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single process-wide career state.
    pub career: CareerStore,
    pub kv: Arc<dyn KeyValueStore>,
    /// Main backend: guidance, interview, resume and learning-path APIs.
    pub api: ApiClient,
    pub roadmap_api: ApiClient,
    pub health: HealthHandle,
}
