//! Camera blocked / lens covered heuristic

use camera_capture::FrameStats;

use super::SustainTimer;
use crate::config::OcclusionConfig;

/// Occlusion state for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcclusionStatus {
    /// A face is visible or the image looks normal
    Clear,
    /// Blocked condition holds, sustain timer running
    Pending,
    /// Blocked condition sustained past the alert gate
    Blocked,
}

#[derive(Debug, Clone)]
pub struct OcclusionDetector {
    config: OcclusionConfig,
    blocked: SustainTimer,
}

impl OcclusionDetector {
    pub fn new(config: OcclusionConfig) -> Self {
        Self {
            config,
            blocked: SustainTimer::default(),
        }
    }

    /// No face and a dark or flat image
    pub fn looks_blocked(&self, face_detected: bool, stats: &FrameStats) -> bool {
        !face_detected
            && (stats.brightness < self.config.brightness_threshold
                || stats.contrast < self.config.contrast_threshold)
    }

    pub fn update(&mut self, face_detected: bool, stats: &FrameStats, now: f64) -> OcclusionStatus {
        if !self.looks_blocked(face_detected, stats) {
            self.blocked.reset();
            return OcclusionStatus::Clear;
        }

        if self.blocked.hold(now) >= self.config.duration_s {
            OcclusionStatus::Blocked
        } else {
            OcclusionStatus::Pending
        }
    }

    pub fn blocked_since(&self) -> Option<f64> {
        self.blocked.since()
    }
}
