//! Smoothed facial-expression tiredness

use ring_buffer::RingBuffer;
use tracing::debug;

use super::SustainTimer;
use crate::config::TirednessConfig;

/// Tiredness state for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TirednessStatus {
    /// History not yet full, no evaluation
    Accumulating,
    /// Majority reached, sustain timer running
    Sustaining,
    /// Majority sustained past the alert gate
    Tired,
    /// Majority lost; history flushed
    Reset,
}

#[derive(Debug, Clone)]
pub struct TirednessStateMachine {
    config: TirednessConfig,
    history: RingBuffer<bool>,
    /// Samples evaluated once the history is full
    required: usize,
    sustained: SustainTimer,
}

impl TirednessStateMachine {
    pub fn new(config: TirednessConfig, frame_rate_hz: f64) -> Self {
        let capacity = config.history_capacity.max(1);
        let required = ((config.duration_s * frame_rate_hz).round() as usize).clamp(1, capacity);
        Self {
            history: RingBuffer::new(capacity),
            required,
            config,
            sustained: SustainTimer::default(),
        }
    }

    /// Lowered eyebrows with a relaxed, not fully closed mouth
    pub fn looks_tired(&self, eyebrow_eye_dist: f64, mar: f64) -> bool {
        eyebrow_eye_dist < self.config.eyebrow_distance_px
            && mar > self.config.mar_lower
            && mar < self.config.mar_upper
    }

    pub fn update(&mut self, eyebrow_eye_dist: f64, mar: f64, now: f64) -> TirednessStatus {
        let tired = self.looks_tired(eyebrow_eye_dist, mar);
        self.history.push(tired);

        if !self.history.is_full() {
            return TirednessStatus::Accumulating;
        }

        if self.tired_ratio() < self.config.majority_ratio {
            debug!("Tiredness majority lost, flushing history");
            self.reset();
            return TirednessStatus::Reset;
        }

        if self.sustained.hold(now) >= self.config.duration_s {
            TirednessStatus::Tired
        } else {
            TirednessStatus::Sustaining
        }
    }

    /// Fraction of tired samples among the most recent `required`
    pub fn tired_ratio(&self) -> f64 {
        let tired = self.history.iter_last(self.required).filter(|&&t| t).count();
        tired as f64 / self.required as f64
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn required_window(&self) -> usize {
        self.required
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.sustained.reset();
    }
}
