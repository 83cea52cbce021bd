//! Fixed-gaze detection for eye hypnotism

use super::SustainTimer;
use crate::config::GazeConfig;
use crate::landmarks::Point;

/// Gaze state for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GazeStatus {
    /// No previous frame to compare against
    Unknown,
    /// At least one eye moved past the threshold
    Moving,
    /// Both eyes still, but not (yet) hypnotic
    Steady,
    /// Fixed gaze sustained with a low blink rate
    Hypnotic,
}

#[derive(Debug, Clone)]
pub struct GazeStabilityMonitor {
    config: GazeConfig,
    previous: Option<(Point, Point)>,
    fixed: SustainTimer,
}

impl GazeStabilityMonitor {
    pub fn new(config: GazeConfig) -> Self {
        Self {
            config,
            previous: None,
            fixed: SustainTimer::default(),
        }
    }

    /// Compare eye centers with the previous frame
    pub fn update(&mut self, left: Point, right: Point, blink_rate_low: bool, now: f64) -> GazeStatus {
        let Some((prev_left, prev_right)) = self.previous.replace((left, right)) else {
            return GazeStatus::Unknown;
        };

        let threshold = self.config.fixed_distance_px;
        if left.distance(&prev_left) >= threshold || right.distance(&prev_right) >= threshold {
            self.fixed.reset();
            return GazeStatus::Moving;
        }

        if self.fixed.hold(now) >= self.config.hypnotism_duration_s && blink_rate_low {
            GazeStatus::Hypnotic
        } else {
            GazeStatus::Steady
        }
    }

    pub fn fixed_since(&self) -> Option<f64> {
        self.fixed.since()
    }

    /// Forget the previous eye centers and the fixed-gaze timer
    pub fn reset(&mut self) {
        self.previous = None;
        self.fixed.reset();
    }
}
