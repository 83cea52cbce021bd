//! Driver state tracking

use tracing::debug;

use crate::config::DmsConfig;
use crate::monitors::{
    BlinkRateMonitor, EyeStateMachine, GazeStabilityMonitor, OcclusionDetector,
    TirednessStateMachine, YawnStateMachine,
};

/// All per-signal state, tracked over time
#[derive(Debug, Clone)]
pub struct DriverState {
    pub eye: EyeStateMachine,
    pub yawn: YawnStateMachine,
    pub blink: BlinkRateMonitor,
    pub gaze: GazeStabilityMonitor,
    pub tiredness: TirednessStateMachine,
    pub occlusion: OcclusionDetector,

    /// Consecutive frames where no face was detected
    pub face_absent_frames: u32,
}

impl DriverState {
    pub fn new(config: &DmsConfig) -> Self {
        Self {
            eye: EyeStateMachine::new(config.eye.clone()),
            yawn: YawnStateMachine::new(config.yawn.clone()),
            blink: BlinkRateMonitor::new(config.blink.clone()),
            gaze: GazeStabilityMonitor::new(config.gaze.clone()),
            tiredness: TirednessStateMachine::new(config.tiredness.clone(), config.frame_rate_hz),
            occlusion: OcclusionDetector::new(config.occlusion.clone()),
            face_absent_frames: 0,
        }
    }

    /// Reset every sustained condition that depends on a visible face.
    ///
    /// The yawn count, its window, and recorded blinks are session-level
    /// and survive face loss.
    pub fn reset_on_face_loss(&mut self) {
        debug!("Resetting face-dependent driver state");
        self.eye.reset();
        self.yawn.reset_episode();
        self.blink.reset_episode();
        self.gaze.reset();
        self.tiredness.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_loss_keeps_session_counters() {
        let mut state = DriverState::new(&DmsConfig::default());

        for _ in 0..6 {
            state.yawn.update(0.9);
        }
        state.yawn.update(0.1);
        state.blink.update(0.1, 1.0);
        state.eye.update(0.1, 1.0);
        state.tiredness.update(20.0, 0.1, 1.0);

        state.reset_on_face_loss();

        assert_eq!(state.yawn.count(), 1);
        assert_eq!(state.blink.blink_count(), 1);
        assert_eq!(state.eye.closed_since(), None);
        assert_eq!(state.tiredness.history_len(), 0);
    }
}
