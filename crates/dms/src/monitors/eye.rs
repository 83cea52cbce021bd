//! Sustained eye closure: drowsy vs. covered

use serde::{Deserialize, Serialize};

use super::SustainTimer;
use crate::config::EyeConfig;

/// Eye state for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EyeStatus {
    /// EAR at or above the closed threshold
    Open,
    /// Closed, sustain timer running
    Closing,
    /// Closed past the sustain period
    Drowsy,
    /// Closed past the sustain period with EAR below the covered threshold
    Covered,
}

impl EyeStatus {
    /// Sustained closure past the alert gate
    pub fn is_alerting(&self) -> bool {
        matches!(self, Self::Drowsy | Self::Covered)
    }
}

#[derive(Debug, Clone)]
pub struct EyeStateMachine {
    config: EyeConfig,
    closed: SustainTimer,
}

impl EyeStateMachine {
    pub fn new(config: EyeConfig) -> Self {
        Self {
            config,
            closed: SustainTimer::default(),
        }
    }

    pub fn update(&mut self, avg_ear: f64, now: f64) -> EyeStatus {
        if avg_ear >= self.config.closed_ear_threshold {
            self.closed.reset();
            return EyeStatus::Open;
        }

        if self.closed.hold(now) < self.config.closed_duration_s {
            EyeStatus::Closing
        } else if avg_ear < self.config.covered_ear_threshold {
            EyeStatus::Covered
        } else {
            EyeStatus::Drowsy
        }
    }

    /// Time at which the current closure began
    pub fn closed_since(&self) -> Option<f64> {
        self.closed.since()
    }

    pub fn reset(&mut self) {
        self.closed.reset();
    }
}
