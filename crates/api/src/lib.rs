//! Driver Monitor Runtime
//!
//! Wires the monitoring engine to a detection stream, the alert delivery
//! worker, and an optional HTTP status server.

use alerting::{AlertCoordinator, DeliveryWorker, LogSink};
use anyhow::Context;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use cloud_sync::MqttAlertSink;
use dms::MonitoringEngine;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod routes;
pub mod runner;
pub mod settings;

pub use routes::alerts::AlertRecord;
pub use routes::status::MonitorStatus;
pub use runner::{LineSource, RunSummary};
pub use settings::{InputSettings, LoggingSettings, ServerSettings, Settings};

/// Application state shared across handlers
pub struct AppState {
    /// Latest monitoring status
    pub status: MonitorStatus,
    /// Per-kind alert records
    pub alerts: Vec<AlertRecord>,
    /// Prometheus render handle (if the recorder is installed)
    pub prometheus: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(prometheus: Option<PrometheusHandle>) -> Self {
        Self {
            status: MonitorStatus::default(),
            alerts: Vec::new(),
            prometheus,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

pub type SharedState = Arc<RwLock<AppState>>;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub frames_processed: u64,
    pub face_detected: bool,
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/status", get(routes::status::get_status))
        .route("/api/v1/alerts", get(routes::alerts::get_alerts))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        frames_processed: state.status.frames_processed,
        face_detected: state.status.face_detected,
    })
}

/// Prometheus scrape handler
async fn metrics_handler(State(state): State<SharedState>) -> impl IntoResponse {
    match &state.read().await.prometheus {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed".to_string(),
        ),
    }
}

/// Initialize logging
pub fn init_logging(settings: &LoggingSettings) {
    let level = settings.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = if settings.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.expect("Failed to set tracing subscriber");
}

/// Install the global Prometheus recorder
fn install_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Metrics recorder unavailable: {}", e);
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Run the monitor until the frame source ends or Ctrl-C
pub async fn run(settings: Settings) -> anyhow::Result<RunSummary> {
    settings.alerting.validate()?;
    settings.dms.validate()?;

    let state: SharedState = Arc::new(RwLock::new(AppState::new(install_metrics())));

    let server = match &settings.server.bind {
        Some(addr) => {
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("binding status server to {}", addr))?;
            info!("Starting status server on {}", addr);
            let app = create_router(state.clone());
            Some(tokio::spawn(async move {
                if let Err(e) = axum::serve(listener, app).await {
                    error!("Status server failed: {}", e);
                }
            }))
        }
        None => None,
    };

    let (sender, receiver) = alerting::channel(&settings.alerting);
    let worker = match &settings.cloud {
        Some(cloud) => {
            info!("Delivering alerts over MQTT to {}", cloud.broker_url);
            let sink = MqttAlertSink::connect(cloud.clone());
            DeliveryWorker::new(sink, receiver, settings.alerting.clone()).spawn()
        }
        None => {
            info!("No cloud configured, alerts are logged only");
            DeliveryWorker::new(LogSink, receiver, settings.alerting.clone()).spawn()
        }
    };

    let mut engine = MonitoringEngine::new(settings.dms.clone(), AlertCoordinator::new(sender))?;

    let lines = match &settings.input.path {
        Some(path) => {
            info!("Replaying detections from {}", path.display());
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("opening {}", path.display()))?;
            runner::spawn_reader(BufReader::new(file))
        }
        None => {
            info!("Reading detections from stdin");
            runner::spawn_stdin().context("starting stdin reader")?
        }
    };
    let summary = runner::run(lines, &mut engine, &state, shutdown_signal()).await;

    // Dropping the engine closes the alert queue so the worker can drain
    drop(engine);
    worker.await.context("alert delivery worker panicked")?;

    if let Some(server) = server {
        server.abort();
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerting::AlertKind;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn get(state: SharedState, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = create_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
    }

    fn state_with_alerts() -> SharedState {
        let mut state = AppState::new(None);
        state.status.frames_processed = 42;
        state.status.camera_blocked = true;
        state.status.active_alerts = vec![AlertKind::CameraBlocked];
        state.alerts = AlertKind::ALL
            .into_iter()
            .map(|kind| AlertRecord {
                kind,
                subject: kind.subject(),
                active: kind == AlertKind::CameraBlocked,
                fire_count: usize::from(kind == AlertKind::CameraBlocked),
                last_raised_s: None,
            })
            .collect();
        Arc::new(RwLock::new(state))
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(state_with_alerts(), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["frames_processed"], 42);
    }

    #[tokio::test]
    async fn test_status() {
        let (status, body) = get(state_with_alerts(), "/api/v1/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["camera_blocked"], true);
        assert_eq!(body["active_alerts"][0], "camera_blocked");
    }

    #[tokio::test]
    async fn test_alerts_filter_active() {
        let (_, all) = get(state_with_alerts(), "/api/v1/alerts").await;
        assert_eq!(all["count"], 6);
        assert_eq!(all["active_count"], 1);

        let (_, active) = get(state_with_alerts(), "/api/v1/alerts?active=true").await;
        assert_eq!(active["count"], 1);
        assert_eq!(active["data"][0]["kind"], "camera_blocked");
    }

    #[tokio::test]
    async fn test_metrics_without_recorder() {
        let (status, _) = get(state_with_alerts(), "/metrics").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
