//! Status Routes

use alerting::AlertKind;
use axum::{extract::State, Json};
use dms::{DmsAnalysis, EyeStatus};
use serde::Serialize;

use crate::SharedState;

/// Latest monitoring state, refreshed every frame
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonitorStatus {
    pub frames_processed: u64,
    pub frames_skipped: u64,
    pub last_timestamp_s: Option<f64>,
    pub face_detected: bool,
    pub eye_status: Option<EyeStatus>,
    pub camera_blocked: bool,
    pub yawn_count: u32,
    pub blink_count: usize,
    pub active_alerts: Vec<AlertKind>,
}

impl MonitorStatus {
    /// Fold one frame's analysis into the status
    pub fn record(&mut self, analysis: &DmsAnalysis, active_alerts: Vec<AlertKind>) {
        self.frames_processed += 1;
        self.last_timestamp_s = Some(analysis.timestamp_s);
        self.face_detected = analysis.face_detected;
        self.eye_status = analysis.eye_status;
        self.camera_blocked = analysis.camera_blocked;
        self.yawn_count = analysis.yawn_count;
        self.blink_count = analysis.blink_count;
        self.active_alerts = active_alerts;
    }
}

/// Get the current monitoring status
pub async fn get_status(State(state): State<SharedState>) -> Json<MonitorStatus> {
    Json(state.read().await.status.clone())
}
