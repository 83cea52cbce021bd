//! Alert Routes

use alerting::{AlertCoordinator, AlertKind};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::SharedState;

/// Query parameters for alerts endpoint
#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    /// Only alerts currently held
    #[serde(default)]
    pub active: Option<bool>,
}

/// Per-kind alert record
#[derive(Debug, Clone, Serialize)]
pub struct AlertRecord {
    pub kind: AlertKind,
    pub subject: &'static str,
    pub active: bool,
    pub fire_count: usize,
    pub last_raised_s: Option<f64>,
}

impl AlertRecord {
    /// Snapshot every alert kind from the coordinator
    pub fn snapshot(coordinator: &AlertCoordinator) -> Vec<AlertRecord> {
        AlertKind::ALL
            .into_iter()
            .map(|kind| {
                let state = coordinator.state(kind).cloned().unwrap_or_default();
                AlertRecord {
                    kind,
                    subject: kind.subject(),
                    active: state.active,
                    fire_count: state.fire_count,
                    last_raised_s: state.last_raised_s,
                }
            })
            .collect()
    }
}

/// Response for alerts endpoint
#[derive(Debug, Serialize)]
pub struct AlertResponse {
    pub data: Vec<AlertRecord>,
    pub count: usize,
    pub active_count: usize,
}

/// Get alerts
pub async fn get_alerts(
    State(state): State<SharedState>,
    Query(params): Query<AlertQuery>,
) -> Json<AlertResponse> {
    let alerts: Vec<_> = state
        .read()
        .await
        .alerts
        .iter()
        .filter(|a| params.active.map_or(true, |active| a.active == active))
        .cloned()
        .collect();

    let active_count = alerts.iter().filter(|a| a.active).count();

    Json(AlertResponse {
        count: alerts.len(),
        active_count,
        data: alerts,
    })
}
