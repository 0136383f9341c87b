//! Analysis configuration.
//!
//! Defaults reproduce the reference experiment setup: five sensors per
//! collection round, the first two Energest reports of every node dropped,
//! and any unparsable timestamp aborting the run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Sensors expected to answer every collection round
pub const DEFAULT_NUM_SENSORS: usize = 5;

/// Energest reports with a lower counter are warm-up noise
pub const DEFAULT_WARMUP_REPORTS: u64 = 2;

/// What to do with a matched line whose timestamp cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Abort the whole run
    #[default]
    Strict,
    /// Skip the line and count it
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub num_sensors: usize,
    pub warmup_reports: u64,
    pub timestamp_policy: TimestampPolicy,
    /// Where CSV tables go; next to the log file when unset
    pub output_dir: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            num_sensors: DEFAULT_NUM_SENSORS,
            warmup_reports: DEFAULT_WARMUP_REPORTS,
            timestamp_policy: TimestampPolicy::Strict,
            output_dir: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("num_sensors must be at least 1")]
    NoSensors,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.num_sensors == 0 {
            return Err(ValidationError::NoSensors);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.num_sensors, 5);
        assert_eq!(config.warmup_reports, 2);
        assert_eq!(config.timestamp_policy, TimestampPolicy::Strict);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AnalysisConfig = serde_yaml::from_str("timestamp_policy: lenient\n").unwrap();
        assert_eq!(config.timestamp_policy, TimestampPolicy::Lenient);
        assert_eq!(config.num_sensors, DEFAULT_NUM_SENSORS);
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_zero_sensors_rejected() {
        let config = AnalysisConfig { num_sensors: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ValidationError::NoSensors)));
    }
}
