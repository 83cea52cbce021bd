//! Cloud Synchronization Module
//!
//! Publishes driver alerts to an MQTT broker so a fleet backend can
//! forward them by email, SMS, or push.

use alerting::{AlertKind, AlertMessage, AlertSink, DeliveryError};
use chrono::{DateTime, Utc};
use rumqttc::{AsyncClient, Event, MqttOptions, QoS};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Cloud sync error types
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<CloudError> for DeliveryError {
    fn from(e: CloudError) -> Self {
        match e {
            CloudError::Connection(_) => DeliveryError::NotConnected,
            CloudError::Publish(msg) => DeliveryError::Transport(msg),
            CloudError::Serialization(msg) => DeliveryError::Serialization(msg),
        }
    }
}

/// Cloud sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// MQTT broker host
    pub broker_url: String,
    /// MQTT port
    pub broker_port: u16,
    /// Vehicle ID
    pub vehicle_id: String,
    /// Keep-alive interval (seconds)
    pub keep_alive_secs: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            broker_url: "localhost".to_string(),
            broker_port: 1883,
            vehicle_id: "unknown".to_string(),
            keep_alive_secs: 30,
        }
    }
}

impl CloudConfig {
    /// Topic alerts for this vehicle are published on
    pub fn alert_topic(&self) -> String {
        format!("vehicles/{}/alerts", self.vehicle_id)
    }
}

/// Alert message for cloud
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEnvelope {
    pub id: Uuid,
    pub vehicle_id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: AlertKind,
    pub subject: String,
    pub message: String,
}

impl AlertEnvelope {
    pub fn new(vehicle_id: &str, alert: &AlertMessage) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id: vehicle_id.to_string(),
            timestamp: Utc::now(),
            kind: alert.kind,
            subject: alert.kind.subject().to_string(),
            message: alert.message.clone(),
        }
    }

    pub fn to_payload(&self) -> Result<Vec<u8>, CloudError> {
        serde_json::to_vec(self).map_err(|e| CloudError::Serialization(e.to_string()))
    }
}

/// MQTT alert sink
pub struct MqttAlertSink {
    config: CloudConfig,
    client: AsyncClient,
}

impl MqttAlertSink {
    /// Connect to the MQTT broker and spawn its event loop
    pub fn connect(config: CloudConfig) -> Self {
        let mut options = MqttOptions::new(
            format!("vehicle-{}", config.vehicle_id),
            &config.broker_url,
            config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));

        let (client, mut eventloop) = AsyncClient::new(options, 10);

        // Spawn event loop handler
        tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(incoming)) => {
                        debug!("MQTT incoming: {:?}", incoming);
                    }
                    Err(e) => {
                        error!("MQTT error: {}", e);
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                    _ => {}
                }
            }
        });

        info!("Connecting to MQTT broker: {}:{}", config.broker_url, config.broker_port);
        Self { config, client }
    }

    async fn publish(&self, alert: &AlertMessage) -> Result<(), CloudError> {
        let payload = AlertEnvelope::new(&self.config.vehicle_id, alert).to_payload()?;

        self.client
            .publish(self.config.alert_topic(), QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|e| CloudError::Publish(e.to_string()))
    }
}

impl AlertSink for MqttAlertSink {
    async fn deliver(&self, alert: &AlertMessage) -> Result<(), DeliveryError> {
        self.publish(alert).await?;
        debug!("Published {} alert to {}", alert.kind, self.config.alert_topic());
        Ok(())
    }
}
