//! Yawn counting with an hourly excessive-yawn window

use tracing::info;

use crate::config::YawnConfig;

/// Outcome of one yawn update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YawnUpdate {
    /// Mouth currently open past the yawn threshold
    pub yawning: bool,
    /// A yawn was committed this frame
    pub committed: bool,
    /// Yawns counted in the current window
    pub count: u32,
    /// Count has reached the excessive threshold
    pub excessive: bool,
}

#[derive(Debug, Clone)]
pub struct YawnStateMachine {
    config: YawnConfig,
    consecutive_frames: u32,
    count: u32,
    window_start: Option<f64>,
}

impl YawnStateMachine {
    pub fn new(config: YawnConfig) -> Self {
        Self {
            config,
            consecutive_frames: 0,
            count: 0,
            window_start: None,
        }
    }

    /// Advance the counting window; returns `true` when it rolled over
    pub fn roll_window(&mut self, now: f64) -> bool {
        let start = *self.window_start.get_or_insert(now);
        if now - start < self.config.window_s {
            return false;
        }

        info!("Yawn window rolled over after {} yawns", self.count);
        self.count = 0;
        self.window_start = Some(now);
        true
    }

    pub fn update(&mut self, mar: f64) -> YawnUpdate {
        let yawning = mar > self.config.mar_threshold;
        let mut committed = false;

        if yawning {
            self.consecutive_frames += 1;
        } else {
            if self.consecutive_frames >= self.config.min_consecutive_frames {
                self.count += 1;
                committed = true;
                info!("Yawn detected! Total yawns: {}", self.count);
            }
            self.consecutive_frames = 0;
        }

        YawnUpdate {
            yawning,
            committed,
            count: self.count,
            excessive: self.count >= self.config.excessive_count,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn consecutive_frames(&self) -> u32 {
        self.consecutive_frames
    }

    /// Drop an in-progress yawn; the hourly count is kept
    pub fn reset_episode(&mut self) {
        self.consecutive_frames = 0;
    }
}
