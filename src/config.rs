//! Link configuration
//!
//! Which device to talk to, over which ports, and how to pace the link.
//! Every field has a default, so an empty JSON object is a valid file.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::Timing;
use crate::protocol::message::DeviceId;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON, or a value outside its allowed range.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A timing value that would disable the link's pacing.
    #[error("{field} must be greater than zero")]
    ZeroDuration {
        /// Offending field.
        field: &'static str,
    },
    /// A gap shorter than the instrument can keep up with.
    #[error("{field} must be at least {min} ms")]
    BelowMinimum {
        /// Offending field.
        field: &'static str,
        /// Smallest accepted value, in milliseconds.
        min: u64,
    },
}

/// Settings for one MIDI link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Device ID, 1..=16.
    pub device_id: DeviceId,
    /// Input port name fragment; the instrument's own port when unset.
    pub input_port: Option<String>,
    /// Output port name fragment; the instrument's own port when unset.
    pub output_port: Option<String>,
    /// Minimum gap between block dumps, in milliseconds.
    pub block_gap_ms: u64,
    /// Minimum gap between real-time parameter changes, in milliseconds.
    pub parameter_gap_ms: u64,
    /// Per-block receive timeout, in milliseconds.
    pub receive_timeout_ms: u64,
    /// Poll interval while waiting for data, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            device_id: DeviceId::default(),
            input_port: None,
            output_port: None,
            block_gap_ms: timing.block_gap.as_millis() as u64,
            parameter_gap_ms: timing.parameter_gap.as_millis() as u64,
            receive_timeout_ms: timing.receive_timeout.as_millis() as u64,
            poll_interval_ms: timing.poll_interval.as_millis() as u64,
        }
    }
}

impl LinkConfig {
    /// Parses a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: LinkConfig = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Save the configuration to a JSON file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn check(&self) -> Result<(), ConfigError> {
        for (field, value, min) in [
            ("block_gap_ms", self.block_gap_ms, Timing::MIN_BLOCK_GAP),
            ("parameter_gap_ms", self.parameter_gap_ms, Timing::MIN_PARAMETER_GAP),
        ] {
            let min = min.as_millis() as u64;
            if value < min {
                return Err(ConfigError::BelowMinimum { field, min });
            }
        }
        for (field, value) in [
            ("receive_timeout_ms", self.receive_timeout_ms),
            ("poll_interval_ms", self.poll_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroDuration { field });
            }
        }
        Ok(())
    }

    /// Sequencer timing from this configuration.
    pub fn timing(&self) -> Timing {
        Timing {
            block_gap: Duration::from_millis(self.block_gap_ms),
            parameter_gap: Duration::from_millis(self.parameter_gap_ms),
            receive_timeout: Duration::from_millis(self.receive_timeout_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}
