//! Alert Coordinator Implementation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};

use crate::{AlertKind, AlertMessage, DeliveryError};

/// Upper bound on delivery attempts per alert
pub const MAX_DELIVERY_ATTEMPTS: u8 = 10;

/// Alert configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Capacity of the queue between the frame loop and the delivery worker
    pub channel_capacity: usize,
    /// Delivery attempts per alert before giving up
    pub max_retries: u8,
    /// Retry backoff base in milliseconds (doubles each attempt)
    pub retry_backoff_ms: u64,
    /// Ceiling for a single retry delay
    pub max_backoff_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            max_retries: 3,
            retry_backoff_ms: 500,
            max_backoff_ms: 5_000,
        }
    }
}

impl AlertConfig {
    /// Check the queue and retry settings are usable
    pub fn validate(&self) -> Result<(), DeliveryError> {
        if self.channel_capacity == 0 {
            return Err(DeliveryError::Config("channel_capacity must be > 0".into()));
        }
        if !(1..=MAX_DELIVERY_ATTEMPTS).contains(&self.max_retries) {
            return Err(DeliveryError::Config(format!(
                "max_retries must be within 1..={}, got {}",
                MAX_DELIVERY_ATTEMPTS, self.max_retries
            )));
        }
        if self.max_backoff_ms < self.retry_backoff_ms {
            return Err(DeliveryError::Config(
                "max_backoff_ms must not be below retry_backoff_ms".into(),
            ));
        }
        Ok(())
    }

    /// Delivery attempts per alert, clamped to `1..=MAX_DELIVERY_ATTEMPTS`
    pub fn attempts(&self) -> u8 {
        self.max_retries.clamp(1, MAX_DELIVERY_ATTEMPTS)
    }

    /// Delay after failed attempt number `attempt` (1-based)
    pub fn backoff(&self, attempt: u8) -> Duration {
        let doublings = u32::from(attempt.saturating_sub(1)).min(31);
        let delay = self
            .retry_backoff_ms
            .saturating_mul(1u64 << doublings)
            .min(self.max_backoff_ms);
        Duration::from_millis(delay)
    }
}

/// Dedup state of one alert kind
#[derive(Debug, Clone, Default)]
pub struct AlertState {
    /// Whether the condition episode has already been alerted
    pub active: bool,
    /// Frame timestamp of the most recent raise
    pub last_raised_s: Option<f64>,
    /// Number of times raised this session
    pub fire_count: usize,
}

/// One-alert-per-episode deduplication in front of the delivery worker
pub struct AlertCoordinator {
    /// Alert states by kind
    states: HashMap<AlertKind, AlertState>,
    /// Handoff to the delivery worker
    sender: mpsc::Sender<AlertMessage>,
}

impl AlertCoordinator {
    /// Create a new coordinator feeding the given delivery queue
    pub fn new(sender: mpsc::Sender<AlertMessage>) -> Self {
        Self {
            states: HashMap::new(),
            sender,
        }
    }

    /// Raise an alert for a condition that currently holds.
    ///
    /// Returns `true` only on the first raise of an episode. The flag is set
    /// even when the queue rejects the message, so a dead transport cannot
    /// cause an alert storm.
    pub fn raise(&mut self, kind: AlertKind, message: impl Into<String>, timestamp_s: f64) -> bool {
        let state = self.states.entry(kind).or_default();
        if state.active {
            return false;
        }

        state.active = true;
        state.last_raised_s = Some(timestamp_s);
        state.fire_count += 1;

        let alert = AlertMessage {
            kind,
            message: message.into(),
            timestamp_s,
        };
        warn!("Alert raised: {} ({})", kind.subject(), alert.message);
        metrics::counter!("dms_alerts_raised_total", "kind" => kind.as_str()).increment(1);

        match self.sender.try_send(alert) {
            Ok(()) => {}
            Err(TrySendError::Full(alert)) => {
                error!("Alert queue full, dropping {} alert", alert.kind);
            }
            Err(TrySendError::Closed(alert)) => {
                error!("Delivery worker gone, dropping {} alert", alert.kind);
            }
        }

        true
    }

    /// Clear the flag once the underlying condition stops holding
    pub fn clear(&mut self, kind: AlertKind) {
        if let Some(state) = self.states.get_mut(&kind) {
            if state.active {
                debug!("Alert cleared: {}", kind);
                state.active = false;
            }
        }
    }

    /// Whether an alert of this kind is held for the current episode
    pub fn is_active(&self, kind: AlertKind) -> bool {
        self.states.get(&kind).is_some_and(|s| s.active)
    }

    /// Currently held alerts, in display priority order
    pub fn active(&self) -> Vec<AlertKind> {
        AlertKind::ALL
            .into_iter()
            .filter(|kind| self.is_active(*kind))
            .collect()
    }

    /// Get the dedup state of one kind
    pub fn state(&self, kind: AlertKind) -> Option<&AlertState> {
        self.states.get(&kind)
    }

    /// Total alerts raised this session
    pub fn total_raised(&self) -> usize {
        self.states.values().map(|s| s.fire_count).sum()
    }

    /// Clear all alert flags
    pub fn clear_all(&mut self) {
        info!("Clearing all alert flags");
        self.states.values_mut().for_each(|s| s.active = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator() -> (AlertCoordinator, mpsc::Receiver<AlertMessage>) {
        let (tx, rx) = mpsc::channel(8);
        (AlertCoordinator::new(tx), rx)
    }

    #[test]
    fn test_deduplication() {
        let (mut coordinator, mut rx) = coordinator();

        // First raise should deliver
        assert!(coordinator.raise(AlertKind::Drowsy, "eyes closed", 1.0));

        // Condition still true: no second delivery
        assert!(!coordinator.raise(AlertKind::Drowsy, "eyes closed", 2.0));

        let delivered = rx.try_recv().unwrap();
        assert_eq!(delivered.kind, AlertKind::Drowsy);
        assert_eq!(delivered.timestamp_s, 1.0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_clear_rearms() {
        let (mut coordinator, mut rx) = coordinator();

        coordinator.raise(AlertKind::Hypnotism, "fixed gaze", 0.0);
        coordinator.clear(AlertKind::Hypnotism);
        assert!(!coordinator.is_active(AlertKind::Hypnotism));
        assert!(coordinator.raise(AlertKind::Hypnotism, "fixed gaze", 5.0));

        assert_eq!(rx.try_recv().unwrap().timestamp_s, 0.0);
        assert_eq!(rx.try_recv().unwrap().timestamp_s, 5.0);
        assert_eq!(coordinator.state(AlertKind::Hypnotism).unwrap().fire_count, 2);
    }

    #[test]
    fn test_kinds_are_independent() {
        let (mut coordinator, _rx) = coordinator();

        coordinator.raise(AlertKind::Drowsy, "a", 0.0);
        assert!(coordinator.raise(AlertKind::EyesCovered, "b", 0.0));
        coordinator.clear(AlertKind::Drowsy);

        assert_eq!(coordinator.active(), vec![AlertKind::EyesCovered]);
        assert_eq!(coordinator.total_raised(), 2);
    }

    #[test]
    fn test_flag_held_when_queue_closed() {
        let (mut coordinator, rx) = coordinator();
        drop(rx);

        assert!(coordinator.raise(AlertKind::CameraBlocked, "blocked", 0.0));
        assert!(coordinator.is_active(AlertKind::CameraBlocked));
        assert!(!coordinator.raise(AlertKind::CameraBlocked, "blocked", 1.0));
    }

    #[test]
    fn test_backoff_doubles_up_to_ceiling() {
        let config = AlertConfig {
            retry_backoff_ms: 500,
            max_backoff_ms: 3_000,
            ..Default::default()
        };
        assert_eq!(config.backoff(1), Duration::from_millis(500));
        assert_eq!(config.backoff(2), Duration::from_millis(1_000));
        assert_eq!(config.backoff(3), Duration::from_millis(2_000));
        assert_eq!(config.backoff(4), Duration::from_millis(3_000));
        assert_eq!(config.backoff(u8::MAX), Duration::from_millis(3_000));
    }

    #[test]
    fn test_validate_limits_retries() {
        assert!(AlertConfig::default().validate().is_ok());

        let too_many = AlertConfig {
            max_retries: 70,
            ..Default::default()
        };
        assert!(matches!(too_many.validate(), Err(DeliveryError::Config(_))));
        assert_eq!(too_many.attempts(), MAX_DELIVERY_ATTEMPTS);

        let none = AlertConfig {
            max_retries: 0,
            ..Default::default()
        };
        assert!(none.validate().is_err());
        assert_eq!(none.attempts(), 1);

        let inverted = AlertConfig {
            retry_backoff_ms: 1_000,
            max_backoff_ms: 10,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let no_queue = AlertConfig {
            channel_capacity: 0,
            ..Default::default()
        };
        assert!(no_queue.validate().is_err());
    }

    #[test]
    fn test_clear_all() {
        let (mut coordinator, _rx) = coordinator();
        coordinator.raise(AlertKind::Tiredness, "t", 0.0);
        coordinator.raise(AlertKind::ExcessiveYawn, "y", 0.0);

        coordinator.clear_all();
        assert!(coordinator.active().is_empty());
    }
}
