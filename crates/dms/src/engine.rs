//! Per-frame orchestration of all monitors

use alerting::{AlertCoordinator, AlertKind};
use tracing::{debug, info};

use crate::analysis::{Color, DmsAnalysis, ToneRequest};
use crate::extractor::{FrameMetrics, MetricExtractor};
use crate::input::DetectionFrame;
use crate::landmarks::FaceLandmarks;
use crate::monitors::{EyeStatus, GazeStatus, OcclusionStatus, TirednessStatus};
use crate::state::DriverState;
use crate::{DmsConfig, DmsError};

/// Alerts that depend on a visible face and are dropped when it is lost
const FACE_ALERTS: [AlertKind; 4] = [
    AlertKind::Drowsy,
    AlertKind::EyesCovered,
    AlertKind::Hypnotism,
    AlertKind::Tiredness,
];

/// Driver monitoring engine: owns all per-signal state and alert flags
pub struct MonitoringEngine {
    config: DmsConfig,
    state: DriverState,
    alerts: AlertCoordinator,
    frames_processed: u64,
}

impl MonitoringEngine {
    /// Create a new engine delivering through the given coordinator
    pub fn new(config: DmsConfig, alerts: AlertCoordinator) -> Result<Self, DmsError> {
        config.validate()?;
        info!("Creating monitoring engine with config: {:?}", config);
        Ok(Self {
            state: DriverState::new(&config),
            config,
            alerts,
            frames_processed: 0,
        })
    }

    /// Evaluate one frame.
    ///
    /// Landmarks are validated before any state is touched, so a rejected
    /// frame leaves the engine exactly as it was.
    pub fn process(&mut self, frame: &DetectionFrame) -> Result<DmsAnalysis, DmsError> {
        let face = frame
            .faces
            .first()
            .map(|f| FaceLandmarks::new(f.landmarks.clone()))
            .transpose()?;

        let now = frame.timestamp;
        self.frames_processed += 1;
        metrics::counter!("dms_frames_processed_total").increment(1);

        let mut analysis = DmsAnalysis {
            timestamp_s: now,
            face_detected: face.is_some(),
            ..Default::default()
        };

        // Session-level windows advance with or without a face
        self.state.blink.evict(now);
        if self.state.yawn.roll_window(now) {
            self.alerts.clear(AlertKind::ExcessiveYawn);
        }

        if face.is_some() {
            self.alerts.clear(AlertKind::CameraBlocked);
        }
        self.evaluate_occlusion(frame, &mut analysis);

        match face {
            Some(landmarks) => {
                if self.state.face_absent_frames > 0 {
                    info!(
                        "Face reacquired after {} frames",
                        self.state.face_absent_frames
                    );
                }
                self.state.face_absent_frames = 0;

                let metrics = MetricExtractor::extract(&landmarks, now);
                self.evaluate_face(&metrics, &mut analysis);
                analysis.metrics = Some(metrics);
            }
            None => self.handle_face_loss(),
        }

        analysis.yawn_count = self.state.yawn.count();
        analysis.blink_count = self.state.blink.blink_count();
        metrics::gauge!("dms_blink_rate").set(analysis.blink_count as f64);
        metrics::gauge!("dms_yawn_count").set(analysis.yawn_count as f64);

        Ok(analysis)
    }

    fn evaluate_occlusion(&mut self, frame: &DetectionFrame, analysis: &mut DmsAnalysis) {
        let status = self
            .state
            .occlusion
            .update(frame.face_detected(), &frame.stats, frame.timestamp);

        match status {
            OcclusionStatus::Blocked => {
                analysis.camera_blocked = true;
                analysis.label("CAMERA BLOCKED!", (20, 90), Color::RED);
                analysis.tones.push(ToneRequest::CAMERA_BLOCKED);
                self.raise(
                    analysis,
                    AlertKind::CameraBlocked,
                    "The camera appears to be blocked or covered completely.".to_string(),
                );
            }
            OcclusionStatus::Clear => self.alerts.clear(AlertKind::CameraBlocked),
            OcclusionStatus::Pending => {}
        }
    }

    fn evaluate_face(&mut self, metrics: &FrameMetrics, analysis: &mut DmsAnalysis) {
        let now = metrics.timestamp_s;

        // Drowsiness / eyes covered
        if let Some(avg_ear) = metrics.avg_ear {
            let status = self.state.eye.update(avg_ear, now);
            match status {
                EyeStatus::Open => {
                    self.alerts.clear(AlertKind::Drowsy);
                    self.alerts.clear(AlertKind::EyesCovered);
                    analysis.label("Eyes Open", (20, 50), Color::GREEN);
                }
                EyeStatus::Closing => {}
                EyeStatus::Drowsy => {
                    analysis.tones.push(ToneRequest::EYES_CLOSED);
                    analysis.label("DROWSY (Eyes Closed)!", (20, 50), Color::RED);
                    self.raise(
                        analysis,
                        AlertKind::Drowsy,
                        "Driver appears to be drowsy or eyes are closed.".to_string(),
                    );
                }
                EyeStatus::Covered => {
                    analysis.tones.push(ToneRequest::EYES_CLOSED);
                    analysis.label("EYES COVERED!", (20, 50), Color::RED);
                    self.raise(
                        analysis,
                        AlertKind::EyesCovered,
                        "Driver's eyes appear to be covered with an object.".to_string(),
                    );
                }
            }
            analysis.eye_status = Some(status);
        } else {
            debug!("Degenerate eye geometry, skipping EAR for this frame");
        }

        // Yawning
        let yawn = self.state.yawn.update(metrics.mar);
        if yawn.yawning {
            analysis.label("YAWNING!", (400, 50), Color::ORANGE);
        }
        if yawn.committed {
            analysis.tones.push(ToneRequest::YAWN);
        }
        if yawn.excessive {
            self.raise(
                analysis,
                AlertKind::ExcessiveYawn,
                format!(
                    "Driver has yawned {} times in the last hour. This indicates severe drowsiness.",
                    yawn.count
                ),
            );
        }
        analysis.label(format!("Yawns: {}", yawn.count), (400, 90), Color::MAGENTA);

        // Blink rate
        if let Some(avg_ear) = metrics.avg_ear {
            self.state.blink.update(avg_ear, now);
        }
        let blink_count = self.state.blink.blink_count();
        analysis.label(format!("Blinks/Min: {}", blink_count), (20, 170), Color::CYAN);

        // Gaze stability
        let gaze = self.state.gaze.update(
            metrics.left_eye_center,
            metrics.right_eye_center,
            self.state.blink.is_rate_low(),
            now,
        );
        match gaze {
            GazeStatus::Hypnotic => {
                analysis.label("EYE HYPNOTISM!", (20, 130), Color::RED);
                analysis.tones.push(ToneRequest::HYPNOTISM);
                self.raise(
                    analysis,
                    AlertKind::Hypnotism,
                    "Driver appears to be experiencing eye hypnotism (fixed gaze, low blink rate)."
                        .to_string(),
                );
            }
            GazeStatus::Moving | GazeStatus::Steady => self.alerts.clear(AlertKind::Hypnotism),
            GazeStatus::Unknown => {}
        }

        // Facial-expression tiredness
        match self
            .state
            .tiredness
            .update(metrics.eyebrow_eye_dist, metrics.mar, now)
        {
            TirednessStatus::Tired => {
                analysis.label("TIREDNESS DETECTED!", (20, 210), Color::AMBER);
                analysis.tones.push(ToneRequest::TIREDNESS);
                self.raise(
                    analysis,
                    AlertKind::Tiredness,
                    "Driver appears to be tired based on facial expressions.".to_string(),
                );
            }
            TirednessStatus::Reset => self.alerts.clear(AlertKind::Tiredness),
            TirednessStatus::Accumulating | TirednessStatus::Sustaining => {}
        }
    }

    fn handle_face_loss(&mut self) {
        if self.state.face_absent_frames == 0 {
            info!("Face lost, resetting sustained driver state");
            metrics::counter!("dms_face_lost_total").increment(1);
        }
        self.state.face_absent_frames = self.state.face_absent_frames.saturating_add(1);

        self.state.reset_on_face_loss();
        for kind in FACE_ALERTS {
            self.alerts.clear(kind);
        }
    }

    fn raise(&mut self, analysis: &mut DmsAnalysis, kind: AlertKind, message: String) {
        if self.alerts.raise(kind, message, analysis.timestamp_s) {
            analysis.alerts.push(kind);
        }
    }

    /// Alert flags held for the current episodes
    pub fn active_alerts(&self) -> Vec<AlertKind> {
        self.alerts.active()
    }

    pub fn alerts(&self) -> &AlertCoordinator {
        &self.alerts
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    pub fn config(&self) -> &DmsConfig {
        &self.config
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Reset driver state and alert flags (on driver change)
    pub fn reset_state(&mut self) {
        info!("Resetting driver state");
        self.state = DriverState::new(&self.config);
        self.alerts.clear_all();
    }
}
