//! Alert identities and payloads

use serde::{Deserialize, Serialize};
use std::fmt;

/// Driver alert kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Eyes closed for a sustained period
    Drowsy,

    /// Eyes occluded by an object (very low EAR)
    EyesCovered,

    /// Lens blocked: no face and a dark or flat image
    CameraBlocked,

    /// Too many yawns within the hourly window
    ExcessiveYawn,

    /// Fixed gaze combined with a low blink rate
    Hypnotism,

    /// Lowered eyebrows with a relaxed mouth
    Tiredness,
}

impl AlertKind {
    /// Every alert kind, in display priority order
    pub const ALL: [AlertKind; 6] = [
        AlertKind::Drowsy,
        AlertKind::EyesCovered,
        AlertKind::CameraBlocked,
        AlertKind::Hypnotism,
        AlertKind::Tiredness,
        AlertKind::ExcessiveYawn,
    ];

    /// Stable identifier used in logs and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drowsy => "drowsy",
            Self::EyesCovered => "eyes_covered",
            Self::CameraBlocked => "camera_blocked",
            Self::ExcessiveYawn => "excessive_yawn",
            Self::Hypnotism => "hypnotism",
            Self::Tiredness => "tiredness",
        }
    }

    /// Human-readable subject line
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Drowsy => "Drowsiness Detected",
            Self::EyesCovered => "Eyes Covered",
            Self::CameraBlocked => "Camera Blocked",
            Self::ExcessiveYawn => "Excessive Yawning Detected",
            Self::Hypnotism => "Eye Hypnotism Detected",
            Self::Tiredness => "Tiredness Detected",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert handed to the delivery worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub kind: AlertKind,
    pub message: String,
    /// Frame timestamp (monotonic seconds) at which the alert was raised
    pub timestamp_s: f64,
}
