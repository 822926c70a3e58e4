use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONNECTION_TIMEOUT_SECS, DEFAULT_FILE_SUFFIX, DEFAULT_IO_TIMEOUT_SECS,
    DEFAULT_LISTEN_ADDR,
};

/// Settings that stay fixed for the lifetime of the service, as opposed to
/// the per-job fields that arrive with each trigger.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceConfig {
    pub listen_addr: String,
    pub file_suffix: String,
    pub connect_timeout_secs: u64,
    pub io_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
            connect_timeout_secs: DEFAULT_CONNECTION_TIMEOUT_SECS,
            io_timeout_secs: DEFAULT_IO_TIMEOUT_SECS,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: ServiceConfig = serde_yaml::from_str(&content)
            .context("Failed to parse YAML config")?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.io_timeout_secs)
    }
}

/// Load the service configuration, falling back to defaults.
///
/// A path that is given but does not exist is an error; silently running with
/// defaults would hide a typo in the service definition.
pub fn load_or_default(config_path: Option<&Path>) -> Result<ServiceConfig> {
    match config_path {
        Some(path) => ServiceConfig::from_yaml_file(path),
        None => {
            info!("No config path provided, using default service configuration");
            Ok(ServiceConfig::default())
        }
    }
}
