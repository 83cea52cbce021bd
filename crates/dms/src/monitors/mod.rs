//! Per-signal temporal state machines
//!
//! Each monitor owns the timers and counters of one signal and is advanced
//! once per frame. Alert dedup flags live in the `AlertCoordinator`; the
//! monitors only report which condition currently holds.

pub mod blink;
pub mod eye;
pub mod gaze;
pub mod occlusion;
pub mod tiredness;
pub mod yawn;

pub use blink::BlinkRateMonitor;
pub use eye::{EyeStateMachine, EyeStatus};
pub use gaze::{GazeStabilityMonitor, GazeStatus};
pub use occlusion::{OcclusionDetector, OcclusionStatus};
pub use tiredness::{TirednessStateMachine, TirednessStatus};
pub use yawn::{YawnStateMachine, YawnUpdate};

/// Records since when a condition has continuously held
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SustainTimer {
    since: Option<f64>,
}

impl SustainTimer {
    /// Mark the condition as holding at `now`; returns how long it has held
    pub fn hold(&mut self, now: f64) -> f64 {
        let since = *self.since.get_or_insert(now);
        (now - since).max(0.0)
    }

    /// The condition stopped holding
    pub fn reset(&mut self) {
        self.since = None;
    }

    pub fn since(&self) -> Option<f64> {
        self.since
    }

    pub fn is_running(&self) -> bool {
        self.since.is_some()
    }
}
