//! Driver Monitoring System (DMS)
//!
//! Real-time driver state analysis from facial landmarks:
//! - Eye closure (drowsiness) and eye occlusion
//! - Yawn counting with an hourly excessive-yawn alert
//! - Blink rate and fixed-gaze "hypnotism"
//! - Facial-expression tiredness
//! - Camera blocked detection

pub mod analysis;
pub mod config;
pub mod engine;
pub mod extractor;
pub mod input;
pub mod landmarks;
pub mod monitors;
pub mod state;

pub use analysis::{Color, DmsAnalysis, OverlayDirective, ToneRequest};
pub use config::{
    BlinkConfig, DmsConfig, EyeConfig, GazeConfig, OcclusionConfig, TirednessConfig, YawnConfig,
};
pub use engine::MonitoringEngine;
pub use extractor::{FrameMetrics, MetricExtractor};
pub use input::{DetectedFace, DetectionFrame};
pub use landmarks::{FaceLandmarks, Point};
pub use monitors::{EyeStatus, GazeStatus, OcclusionStatus, TirednessStatus};
pub use state::DriverState;

use camera_capture::CameraError;
use thiserror::Error;

/// DMS error types
#[derive(Error, Debug)]
pub enum DmsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image processing failed: {0}")]
    ImageProcessing(#[from] CameraError),

    #[error("Keypoints missing for feature calculation: expected {expected}, got {actual}")]
    KeypointsMissing { expected: usize, actual: usize },
}
