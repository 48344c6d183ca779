//! Guidance service health monitor.
//!
//! Probes `GET {guidance}/api/health` once at startup and then on a fixed
//! interval, publishing the latest status through a `watch` channel. A probe
//! can be forced with `retry`, and `reset` clears the counters before probing.

use std::time::Duration;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api_client::{ApiClient, ApiError};

pub mod handlers;

const HEALTH_PATH: &str = "api/health";

const TIMEOUT_ERROR: &str = "Service health check timeout - guidance service is not responding";
const CONNECT_ERROR: &str = "Cannot connect to guidance service - network error";
const UNHEALTHY_ERROR: &str = "Service returned unhealthy status";

/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthCheck {
    pub healthy: bool,
    pub status: Option<Value>,
    pub error: Option<String>,
}

impl HealthCheck {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            status: None,
            error: Some(error.into()),
        }
    }
}

/// Healthy only for a 2xx response whose body has `status == "ok"`.
pub async fn check_service_health(api: &ApiClient) -> HealthCheck {
    match api.get_json::<Value>(HEALTH_PATH, &[]).await {
        Ok(body) if body.get("status").and_then(Value::as_str) == Some("ok") => HealthCheck {
            healthy: true,
            status: Some(body),
            error: None,
        },
        Ok(_) => HealthCheck::failed(UNHEALTHY_ERROR),
        Err(ApiError::Timeout) => HealthCheck::failed(TIMEOUT_ERROR),
        Err(ApiError::Connect(_)) | Err(ApiError::Http(_)) => HealthCheck::failed(CONNECT_ERROR),
        Err(ApiError::Api { status, .. }) => {
            let reason = StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("");
            HealthCheck::failed(format!("Health check failed: {status} {reason}").trim_end().to_string())
        }
        Err(e) => HealthCheck::failed(e.to_string()),
    }
}

/// Maps a probe error to the text shown to the user.
pub fn format_error_message(error: Option<&str>) -> String {
    let Some(error) = error.filter(|e| !e.is_empty()) else {
        return String::new();
    };

    const MESSAGES: &[(&str, &str)] = &[
        ("Service health check timeout", "Service is not responding (timeout)"),
        ("Cannot connect", "Cannot establish connection to guidance service"),
        ("not responding", "Guidance service is not responding"),
    ];

    MESSAGES
        .iter()
        .find(|(needle, _)| error.contains(needle))
        .map(|(_, message)| message.to_string())
        .unwrap_or_else(|| error.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Monitor
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub is_healthy: bool,
    pub is_checking: bool,
    pub error: Option<String>,
    pub message: String,
    pub last_checked: Option<DateTime<Utc>>,
    pub check_count: u64,
}

impl HealthStatus {
    fn initial() -> Self {
        Self {
            is_healthy: false,
            is_checking: true,
            error: None,
            message: String::new(),
            last_checked: None,
            check_count: 0,
        }
    }
}

enum Command {
    Retry(oneshot::Sender<HealthStatus>),
    Reset(oneshot::Sender<HealthStatus>),
}

/// Cheap handle shared with request handlers.
#[derive(Clone)]
pub struct HealthHandle {
    status: watch::Receiver<HealthStatus>,
    commands: mpsc::Sender<Command>,
}

impl HealthHandle {
    pub fn current(&self) -> HealthStatus {
        self.status.borrow().clone()
    }

    /// Probes now and returns the fresh status. `None` if the monitor has stopped.
    pub async fn retry(&self) -> Option<HealthStatus> {
        let (tx, rx) = oneshot::channel();
        self.commands.send(Command::Retry(tx)).await.ok()?;
        rx.await.ok()
    }

    /// Clears counters and error, then probes.
    pub async fn reset(&self) -> Option<HealthStatus> {
        let (tx, rx) = oneshot::channel();
        self.commands.send(Command::Reset(tx)).await.ok()?;
        rx.await.ok()
    }
}

pub struct HealthMonitor {
    api: ApiClient,
    interval: Duration,
    status: watch::Sender<HealthStatus>,
    commands: mpsc::Receiver<Command>,
}

impl HealthMonitor {
    /// Starts the probe loop. It stops once every handle has been dropped.
    pub fn spawn(api: ApiClient, interval: Duration) -> (HealthHandle, JoinHandle<()>) {
        let (status_tx, status_rx) = watch::channel(HealthStatus::initial());
        let (command_tx, command_rx) = mpsc::channel(8);

        let monitor = HealthMonitor {
            api,
            interval,
            status: status_tx,
            commands: command_rx,
        };
        let task = tokio::spawn(monitor.run());

        (
            HealthHandle {
                status: status_rx,
                commands: command_tx,
            },
            task,
        )
    }

    async fn run(mut self) {
        info!(
            "Health monitor started for {} (every {:?})",
            self.api.base_url(),
            self.interval
        );
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the startup probe takes its place.
        ticker.tick().await;
        self.probe().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.probe().await;
                }
                command = self.commands.recv() => match command {
                    Some(Command::Retry(reply)) => {
                        let status = self.probe().await;
                        let _ = reply.send(status);
                    }
                    Some(Command::Reset(reply)) => {
                        self.status.send_replace(HealthStatus::initial());
                        let status = self.probe().await;
                        let _ = reply.send(status);
                    }
                    None => break,
                },
            }
        }

        debug!("Health monitor stopped");
    }

    async fn probe(&self) -> HealthStatus {
        self.status.send_modify(|s| s.is_checking = true);
        let check = check_service_health(&self.api).await;

        let was_healthy = self.status.borrow().is_healthy;
        match (&check.error, was_healthy) {
            (None, false) => info!("Guidance service is healthy"),
            (Some(e), true) => warn!("Guidance service became unhealthy: {e}"),
            (Some(e), false) => debug!("Guidance service still unhealthy: {e}"),
            (None, true) => {}
        }

        self.status.send_modify(|s| {
            s.is_healthy = check.healthy;
            s.is_checking = false;
            s.message = format_error_message(check.error.as_deref());
            s.error = check.error;
            s.last_checked = Some(Utc::now());
            s.check_count += 1;
        });
        self.status.borrow().clone()
    }
}
