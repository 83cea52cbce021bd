//! Runtime settings

use alerting::AlertConfig;
use cloud_sync::CloudConfig;
use config::{Config, ConfigError, Environment, File};
use dms::DmsConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default settings file looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "driver-monitor";

/// Status server settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Listen address (e.g. "0.0.0.0:8080"); no server when unset
    pub bind: Option<String>,
}

/// Frame source settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// JSON-lines detection file; stdin when unset
    pub path: Option<PathBuf>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Max level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON log lines
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// All runtime settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dms: DmsConfig,
    pub alerting: AlertConfig,
    /// MQTT delivery; alerts are only logged when unset
    pub cloud: Option<CloudConfig>,
    pub server: ServerSettings,
    pub input: InputSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load defaults, then the settings file, then `DMS__*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path),
            None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("DMS").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[dms]
frame_rate_hz = 15.0

[dms.eye]
closed_duration_s = 3.0

[alerting]
max_retries = 5

[cloud]
broker_url = "mqtt.fleet.local"
vehicle_id = "bus-7"

[server]
bind = "127.0.0.1:9000"
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.dms.frame_rate_hz, 15.0);
        assert_eq!(settings.dms.eye.closed_duration_s, 3.0);
        assert_eq!(settings.dms.eye.closed_ear_threshold, 0.25);
        assert_eq!(settings.alerting.max_retries, 5);
        assert!(settings.alerting.validate().is_ok());
        let cloud = settings.cloud.unwrap();
        assert_eq!(cloud.vehicle_id, "bus-7");
        assert_eq!(cloud.broker_port, 1883);
        assert_eq!(settings.server.bind.as_deref(), Some("127.0.0.1:9000"));
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/driver-monitor.toml"))).is_err());
    }
}
