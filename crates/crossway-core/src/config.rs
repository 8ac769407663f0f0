//! Typed configuration for the Crossway signal controller.
//!
//! The canonical configuration lives in `crossway-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure, a loader, and construction-time validation. The
//! controller never re-parses configuration at runtime; everything here
//! is fixed once the controller is built.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but its values are unusable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level signal controller configuration.
///
/// Mirrors the structure of `crossway-config.yaml`. All fields have
/// defaults matching the deployed intersection's tuning.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SignalConfig {
    /// Density classifier thresholds and adjustment.
    #[serde(default)]
    pub density: DensityConfig,

    /// Phase interval lengths and green clamp.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Rush-hour windows and multiplier.
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl SignalConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Check that the configured values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the density thresholds are not
    /// strictly ordered, the green clamp is inverted, or a rush window is
    /// empty or extends past hour 24.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.density.dense_threshold <= self.density.thin_threshold {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "dense_threshold ({}) must exceed thin_threshold ({})",
                    self.density.dense_threshold, self.density.thin_threshold
                ),
            });
        }
        if self.timing.min_green_secs > self.timing.max_green_secs {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "min_green_secs ({}) must not exceed max_green_secs ({})",
                    self.timing.min_green_secs, self.timing.max_green_secs
                ),
            });
        }
        for window in &self.schedule.rush_windows {
            if window.start_hour >= window.end_hour {
                return Err(ConfigError::Invalid {
                    reason: format!(
                        "rush window {}..{} is empty",
                        window.start_hour, window.end_hour
                    ),
                });
            }
            if window.end_hour > 24 {
                return Err(ConfigError::Invalid {
                    reason: format!(
                        "rush window {}..{} extends past hour 24",
                        window.start_hour, window.end_hour
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Density classifier configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DensityConfig {
    /// Count at or above which traffic is classified dense.
    #[serde(default = "default_dense_threshold")]
    pub dense_threshold: u32,

    /// Count at or below which traffic is classified thin.
    #[serde(default = "default_thin_threshold")]
    pub thin_threshold: u32,

    /// Fractional green extension applied while traffic is dense.
    #[serde(default = "default_adjustment")]
    pub adjustment: f64,

    /// Whether the density signal feeds the duration calculation at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            dense_threshold: default_dense_threshold(),
            thin_threshold: default_thin_threshold(),
            adjustment: default_adjustment(),
            enabled: true,
        }
    }
}

/// Phase interval configuration, all in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// Base green interval before schedule and density adjustments.
    #[serde(default = "default_base_green_secs")]
    pub base_green_secs: u32,

    /// Yellow clearance interval.
    #[serde(default = "default_yellow_secs")]
    pub yellow_secs: u32,

    /// All-red clearance interval.
    #[serde(default = "default_all_red_secs")]
    pub all_red_secs: u32,

    /// Green interval granted to an emergency vehicle.
    #[serde(default = "default_emergency_green_secs")]
    pub emergency_green_secs: u32,

    /// Lower clamp on the computed green interval.
    #[serde(default = "default_min_green_secs")]
    pub min_green_secs: u32,

    /// Upper clamp on the computed green interval.
    #[serde(default = "default_max_green_secs")]
    pub max_green_secs: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            base_green_secs: default_base_green_secs(),
            yellow_secs: default_yellow_secs(),
            all_red_secs: default_all_red_secs(),
            emergency_green_secs: default_emergency_green_secs(),
            min_green_secs: default_min_green_secs(),
            max_green_secs: default_max_green_secs(),
        }
    }
}

/// Rush-hour schedule configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduleConfig {
    /// Multiplier applied to the base green during a rush window.
    #[serde(default = "default_rush_multiplier")]
    pub rush_multiplier: f64,

    /// Hour-of-day windows during which the multiplier applies.
    #[serde(default = "default_rush_windows")]
    pub rush_windows: Vec<RushWindow>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            rush_multiplier: default_rush_multiplier(),
            rush_windows: default_rush_windows(),
        }
    }
}

/// A half-open hour-of-day interval: `start_hour` inclusive,
/// `end_hour` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RushWindow {
    /// First hour inside the window.
    pub start_hour: u32,
    /// First hour past the window.
    pub end_hour: u32,
}

impl RushWindow {
    /// Whether the given hour-of-day falls inside this window.
    pub const fn contains(self, hour: u32) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_dense_threshold() -> u32 {
    15
}

const fn default_thin_threshold() -> u32 {
    8
}

const fn default_adjustment() -> f64 {
    0.5
}

const fn default_base_green_secs() -> u32 {
    30
}

const fn default_yellow_secs() -> u32 {
    3
}

const fn default_all_red_secs() -> u32 {
    2
}

const fn default_emergency_green_secs() -> u32 {
    25
}

const fn default_min_green_secs() -> u32 {
    15
}

const fn default_max_green_secs() -> u32 {
    60
}

const fn default_rush_multiplier() -> f64 {
    1.3
}

fn default_rush_windows() -> Vec<RushWindow> {
    vec![
        RushWindow {
            start_hour: 7,
            end_hour: 9,
        },
        RushWindow {
            start_hour: 17,
            end_hour: 19,
        },
    ]
}

const fn default_true() -> bool {
    true
}
