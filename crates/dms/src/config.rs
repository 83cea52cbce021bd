//! DMS configuration

use serde::{Deserialize, Serialize};

use crate::DmsError;

/// Eye closure thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeConfig {
    /// Average EAR below which the eyes count as closed
    pub closed_ear_threshold: f64,
    /// Average EAR below which a sustained closure is classified as covered
    pub covered_ear_threshold: f64,
    /// Sustained closure before alerting (seconds)
    pub closed_duration_s: f64,
}

impl Default for EyeConfig {
    fn default() -> Self {
        Self {
            closed_ear_threshold: 0.25,
            covered_ear_threshold: 0.10,
            closed_duration_s: 4.0,
        }
    }
}

/// Yawn counting thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YawnConfig {
    /// MAR above which the mouth counts as yawning
    pub mar_threshold: f64,
    /// Consecutive yawning frames needed to commit one yawn
    pub min_consecutive_frames: u32,
    /// Length of the counting window (seconds)
    pub window_s: f64,
    /// Yawns within one window that trigger the excessive-yawn alert
    pub excessive_count: u32,
}

impl Default for YawnConfig {
    fn default() -> Self {
        Self {
            mar_threshold: 0.7,
            min_consecutive_frames: 5,
            window_s: 3600.0,
            excessive_count: 3,
        }
    }
}

/// Blink rate thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    /// Average EAR below which a blink is registered
    pub ear_threshold: f64,
    /// Trailing window for the blink rate (seconds)
    pub window_s: f64,
    /// Blinks per window below which the rate counts as abnormally low
    pub min_blinks: usize,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.20,
            window_s: 60.0,
            min_blinks: 8,
        }
    }
}

/// Gaze stability thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeConfig {
    /// Maximum per-frame eye-center movement for a fixed gaze (pixels)
    pub fixed_distance_px: f64,
    /// Sustained fixed gaze before alerting (seconds)
    pub hypnotism_duration_s: f64,
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            fixed_distance_px: 5.0,
            hypnotism_duration_s: 10.0,
        }
    }
}

/// Facial-expression tiredness thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TirednessConfig {
    /// Eyebrow-to-eyelid distance below which eyebrows count as lowered (pixels)
    pub eyebrow_distance_px: f64,
    /// Lower MAR bound of a relaxed mouth (exclusive)
    pub mar_lower: f64,
    /// Upper MAR bound of a relaxed mouth (exclusive)
    pub mar_upper: f64,
    /// Sustained majority before alerting (seconds)
    pub duration_s: f64,
    /// Samples kept in the smoothing history
    pub history_capacity: usize,
    /// Fraction of tired samples required in the history window
    pub majority_ratio: f64,
}

impl Default for TirednessConfig {
    fn default() -> Self {
        Self {
            eyebrow_distance_px: 25.0,
            mar_lower: 0.05,
            mar_upper: 0.2,
            duration_s: 5.0,
            history_capacity: 30,
            majority_ratio: 0.75,
        }
    }
}

/// Camera occlusion thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcclusionConfig {
    /// Mean intensity below which the frame counts as dark
    pub brightness_threshold: f64,
    /// Intensity std-dev below which the frame counts as flat
    pub contrast_threshold: f64,
    /// Sustained blocked condition before alerting (seconds)
    pub duration_s: f64,
}

impl Default for OcclusionConfig {
    fn default() -> Self {
        Self {
            brightness_threshold: 40.0,
            contrast_threshold: 15.0,
            duration_s: 4.0,
        }
    }
}

/// DMS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DmsConfig {
    pub eye: EyeConfig,
    pub yawn: YawnConfig,
    pub blink: BlinkConfig,
    pub gaze: GazeConfig,
    pub tiredness: TirednessConfig,
    pub occlusion: OcclusionConfig,
    /// Effective camera frame rate, used to size the tiredness window
    pub frame_rate_hz: f64,
}

impl Default for DmsConfig {
    fn default() -> Self {
        Self {
            eye: EyeConfig::default(),
            yawn: YawnConfig::default(),
            blink: BlinkConfig::default(),
            gaze: GazeConfig::default(),
            tiredness: TirednessConfig::default(),
            occlusion: OcclusionConfig::default(),
            frame_rate_hz: 30.0,
        }
    }
}

impl DmsConfig {
    /// Create strict config (shorter sustain periods)
    pub fn strict() -> Self {
        Self {
            eye: EyeConfig {
                closed_duration_s: 2.0,
                ..Default::default()
            },
            gaze: GazeConfig {
                hypnotism_duration_s: 6.0,
                ..Default::default()
            },
            tiredness: TirednessConfig {
                duration_s: 3.0,
                ..Default::default()
            },
            occlusion: OcclusionConfig {
                duration_s: 2.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Create lenient config (longer sustain periods)
    pub fn lenient() -> Self {
        Self {
            eye: EyeConfig {
                closed_duration_s: 6.0,
                ..Default::default()
            },
            yawn: YawnConfig {
                excessive_count: 5,
                ..Default::default()
            },
            gaze: GazeConfig {
                hypnotism_duration_s: 15.0,
                ..Default::default()
            },
            tiredness: TirednessConfig {
                duration_s: 8.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Check thresholds are usable
    pub fn validate(&self) -> Result<(), DmsError> {
        let durations = [
            ("eye.closed_duration_s", self.eye.closed_duration_s),
            ("yawn.window_s", self.yawn.window_s),
            ("blink.window_s", self.blink.window_s),
            ("gaze.hypnotism_duration_s", self.gaze.hypnotism_duration_s),
            ("tiredness.duration_s", self.tiredness.duration_s),
            ("occlusion.duration_s", self.occlusion.duration_s),
            ("frame_rate_hz", self.frame_rate_hz),
        ];
        for (name, value) in durations {
            if !(value.is_finite() && value > 0.0) {
                return Err(DmsError::Config(format!("{} must be positive, got {}", name, value)));
            }
        }

        if self.eye.covered_ear_threshold >= self.eye.closed_ear_threshold {
            return Err(DmsError::Config(
                "eye.covered_ear_threshold must be below eye.closed_ear_threshold".into(),
            ));
        }
        if self.tiredness.mar_lower >= self.tiredness.mar_upper {
            return Err(DmsError::Config(
                "tiredness.mar_lower must be below tiredness.mar_upper".into(),
            ));
        }
        if self.tiredness.history_capacity == 0 {
            return Err(DmsError::Config("tiredness.history_capacity must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.tiredness.majority_ratio) {
            return Err(DmsError::Config("tiredness.majority_ratio must be within [0, 1]".into()));
        }

        Ok(())
    }
}
