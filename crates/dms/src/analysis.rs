//! DMS analysis results, overlay directives, and tone requests

use alerting::AlertKind;
use serde::{Deserialize, Serialize};

use crate::extractor::FrameMetrics;
use crate::monitors::EyeStatus;

/// RGB overlay color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const AMBER: Color = Color::rgb(255, 100, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Text label for the display collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayDirective {
    pub text: String,
    /// Top-left anchor in frame pixels
    pub position: (i32, i32),
    pub color: Color,
}

impl OverlayDirective {
    pub fn new(text: impl Into<String>, position: (i32, i32), color: Color) -> Self {
        Self {
            text: text.into(),
            position,
            color,
        }
    }
}

/// Audible cue for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneRequest {
    pub frequency_hz: u32,
    pub duration_ms: u32,
}

impl ToneRequest {
    pub const EYES_CLOSED: ToneRequest = ToneRequest::new(1000, 1000);
    pub const CAMERA_BLOCKED: ToneRequest = ToneRequest::new(1200, 1000);
    pub const YAWN: ToneRequest = ToneRequest::new(800, 300);
    pub const HYPNOTISM: ToneRequest = ToneRequest::new(1500, 1000);
    pub const TIREDNESS: ToneRequest = ToneRequest::new(900, 700);

    pub const fn new(frequency_hz: u32, duration_ms: u32) -> Self {
        Self {
            frequency_hz,
            duration_ms,
        }
    }
}

/// Complete DMS analysis result for one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DmsAnalysis {
    /// Frame timestamp (seconds)
    pub timestamp_s: f64,

    /// Whether a face was detected
    pub face_detected: bool,

    /// Facial measurements (if a face was detected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<FrameMetrics>,

    /// Eye state (if EAR was measurable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye_status: Option<EyeStatus>,

    /// Camera blocked display state
    pub camera_blocked: bool,

    /// Yawns in the current hourly window
    pub yawn_count: u32,

    /// Blinks in the trailing window
    pub blink_count: usize,

    /// Labels to draw this frame
    pub overlay: Vec<OverlayDirective>,

    /// Tones to play this frame
    pub tones: Vec<ToneRequest>,

    /// Alerts newly raised this frame
    pub alerts: Vec<AlertKind>,
}

impl DmsAnalysis {
    /// Check if any alerts were raised this frame
    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    /// Check whether a label with this text is drawn
    pub fn has_label(&self, text: &str) -> bool {
        self.overlay.iter().any(|o| o.text == text)
    }

    pub(crate) fn label(&mut self, text: impl Into<String>, position: (i32, i32), color: Color) {
        self.overlay.push(OverlayDirective::new(text, position, color));
    }
}
