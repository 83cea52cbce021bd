//! Fire-and-forget alert delivery

use std::future::Future;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{AlertConfig, AlertMessage};

/// Delivery error types
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Transport failed: {0}")]
    Transport(String),

    #[error("Sink not connected")]
    NotConnected,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid alert configuration: {0}")]
    Config(String),
}

/// Destination for alerts (email, MQTT, push, ...)
pub trait AlertSink: Send + Sync + 'static {
    /// Deliver a single alert
    fn deliver(
        &self,
        alert: &AlertMessage,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

/// Sink that only writes alerts to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AlertSink for LogSink {
    async fn deliver(&self, alert: &AlertMessage) -> Result<(), DeliveryError> {
        info!(
            kind = alert.kind.as_str(),
            timestamp_s = alert.timestamp_s,
            "{}: {}",
            alert.kind.subject(),
            alert.message
        );
        Ok(())
    }
}

/// Create the bounded queue between the frame loop and the worker
pub fn channel(config: &AlertConfig) -> (mpsc::Sender<AlertMessage>, mpsc::Receiver<AlertMessage>) {
    mpsc::channel(config.channel_capacity.max(1))
}

/// Consumes queued alerts and hands them to a sink
pub struct DeliveryWorker<S> {
    sink: S,
    receiver: mpsc::Receiver<AlertMessage>,
    config: AlertConfig,
}

impl<S: AlertSink> DeliveryWorker<S> {
    /// Create a new delivery worker
    pub fn new(sink: S, receiver: mpsc::Receiver<AlertMessage>, config: AlertConfig) -> Self {
        Self {
            sink,
            receiver,
            config,
        }
    }

    /// Spawn the worker onto the tokio runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run until every sender has been dropped and the queue is drained
    pub async fn run(mut self) {
        info!("Starting alert delivery worker");

        while let Some(alert) = self.receiver.recv().await {
            self.deliver_with_retry(&alert).await;
        }

        info!("Alert delivery worker stopped");
    }

    async fn deliver_with_retry(&self, alert: &AlertMessage) {
        let attempts = self.config.attempts();
        let kind = alert.kind.as_str();

        for attempt in 1..=attempts {
            match self.sink.deliver(alert).await {
                Ok(()) => {
                    metrics::counter!("dms_alerts_delivered_total", "kind" => kind).increment(1);
                    return;
                }
                Err(e) => {
                    warn!("Delivery of {} alert failed (attempt {}/{}): {}", kind, attempt, attempts, e);
                    if attempt < attempts {
                        tokio::time::sleep(self.config.backoff(attempt)).await;
                    }
                }
            }
        }

        metrics::counter!("dms_alert_delivery_failures_total", "kind" => kind).increment(1);
        error!("Giving up on {} alert after {} attempts", kind, attempts);
    }
}
