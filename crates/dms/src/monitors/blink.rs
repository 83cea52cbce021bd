//! Rolling blink rate over a trailing time window

use std::collections::VecDeque;
use tracing::debug;

use crate::config::BlinkConfig;

#[derive(Debug, Clone)]
pub struct BlinkRateMonitor {
    config: BlinkConfig,
    /// Blink timestamps, oldest first
    blinks: VecDeque<f64>,
    /// EAR is currently below the blink threshold
    in_blink: bool,
}

impl BlinkRateMonitor {
    pub fn new(config: BlinkConfig) -> Self {
        Self {
            config,
            blinks: VecDeque::new(),
            in_blink: false,
        }
    }

    /// Feed one EAR sample; returns `true` when a new blink was registered
    pub fn update(&mut self, avg_ear: f64, now: f64) -> bool {
        if avg_ear >= self.config.ear_threshold {
            self.in_blink = false;
            return false;
        }
        if self.in_blink {
            return false;
        }

        self.in_blink = true;
        self.blinks.push_back(now);
        debug!("Blink registered at {:.3}s", now);
        true
    }

    /// Drop blinks older than the window
    pub fn evict(&mut self, now: f64) {
        let cutoff = now - self.config.window_s;
        while self.blinks.front().is_some_and(|&t| t < cutoff) {
            self.blinks.pop_front();
        }
    }

    /// Blinks within the trailing window
    pub fn blink_count(&self) -> usize {
        self.blinks.len()
    }

    /// Blink count below the configured minimum
    pub fn is_rate_low(&self) -> bool {
        self.blink_count() < self.config.min_blinks
    }

    /// Forget the in-progress dip; recorded blinks are kept
    pub fn reset_episode(&mut self) {
        self.in_blink = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_blink_per_dip() {
        let mut monitor = BlinkRateMonitor::new(BlinkConfig::default());
        assert!(monitor.update(0.1, 0.0));
        assert!(!monitor.update(0.1, 0.03));
        assert!(!monitor.update(0.15, 0.06));
        assert!(!monitor.update(0.3, 0.1));
        assert!(monitor.update(0.1, 0.2));
        assert_eq!(monitor.blink_count(), 2);
    }

    #[test]
    fn test_drowsy_range_is_not_a_blink() {
        let mut monitor = BlinkRateMonitor::new(BlinkConfig::default());
        assert!(!monitor.update(0.22, 0.0));
        assert_eq!(monitor.blink_count(), 0);
    }

    #[test]
    fn test_window_eviction() {
        let mut monitor = BlinkRateMonitor::new(BlinkConfig::default());
        monitor.update(0.1, 0.0);

        monitor.evict(59.9);
        assert_eq!(monitor.blink_count(), 1);

        monitor.evict(60.1);
        assert_eq!(monitor.blink_count(), 0);
    }

    #[test]
    fn test_rate_low() {
        let mut monitor = BlinkRateMonitor::new(BlinkConfig::default());
        for i in 0..8 {
            let t = i as f64;
            monitor.update(0.1, t);
            monitor.update(0.3, t + 0.5);
        }
        assert!(!monitor.is_rate_low());
        monitor.evict(60.5);
        assert!(monitor.is_rate_low());
    }
}
