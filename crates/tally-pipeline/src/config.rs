//! Configuration for batch runs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the batch orchestrator
///
/// # Examples
///
/// ```
/// use tally_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.input_dir.to_str(), Some("uploads"));
/// assert_eq!(config.concurrency, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory scanned (non-recursively) for `.pdf` files
    pub input_dir: PathBuf,

    /// Files processed at the same time
    /// Default: 1 (strictly sequential)
    pub concurrency: usize,

    /// Maximum time for a single store write (seconds)
    pub store_timeout_secs: u64,
}

impl PipelineConfig {
    /// Get the store write timeout as a Duration
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.input_dir.as_os_str().is_empty() {
            return Err("input_dir must not be empty".to_string());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".to_string());
        }
        if self.store_timeout_secs == 0 {
            return Err("store_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("uploads"),
            concurrency: 1,
            store_timeout_secs: 60,
        }
    }
}
