mod api_client;
mod assessment;
mod career;
mod config;
mod errors;
mod guidance;
mod health;
mod interview;
mod resume;
mod routes;
mod session;
mod state;
mod storage;
mod views;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::ApiClient;
use crate::career::store::CareerStore;
use crate::config::Config;
use crate::health::HealthMonitor;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{FileStore, KeyValueStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("nexus_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Nexus API v{}", env!("CARGO_PKG_VERSION"));

    // Durable storage
    let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage_dir).await?);
    info!("Storage opened at {}", config.storage_dir.display());

    // Shared career state
    let career = CareerStore::new(kv.clone());
    let readiness = career.hydrate().await;
    info!("Career state ready ({readiness:?})");

    // Upstream clients
    let api = ApiClient::new(&config.api_base_url, config.upstream_timeout, kv.clone())?;
    let roadmap_api =
        ApiClient::new(&config.roadmap_service_url, config.upstream_timeout, kv.clone())?;
    info!(
        "Upstreams: api={} roadmap={}",
        api.base_url(),
        roadmap_api.base_url()
    );

    // Guidance service health monitor
    let probe = ApiClient::new(&config.guidance_service_url, config.health_timeout, kv.clone())?;
    let (health, _monitor) = HealthMonitor::spawn(probe, config.health_interval);

    let state = AppState {
        career,
        kv,
        api,
        roadmap_api,
        health,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
