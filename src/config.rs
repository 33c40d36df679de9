//! Configuration loading and management
//!
//! Handles parsing of `.rplan.toml` in the planner directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;

/// Name of the config file in the planner directory
pub const CONFIG_FILE: &str = ".rplan.toml";

const MAX_LOCK_TIMEOUT_MS: u64 = 60_000;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Record file, relative to the planner directory
    #[serde(default = "default_store")]
    pub store: String,

    /// Locking configuration
    #[serde(default)]
    pub locking: LockingConfig,

    /// Team plan configuration
    #[serde(default)]
    pub plan: PlanConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: default_store(),
            locking: LockingConfig::default(),
            plan: PlanConfig::default(),
        }
    }
}

fn default_store() -> String {
    "rplan.json".to_string()
}

/// Record file locking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockingConfig {
    /// How long a writer waits for the record file lock
    #[serde(default = "default_lock_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for LockingConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_lock_timeout_ms(),
        }
    }
}

/// Team plan output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// List members that have nothing assigned
    #[serde(default = "default_true")]
    pub show_empty_members: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            show_empty_members: true,
        }
    }
}

impl Config {
    /// Load configuration from a `.rplan.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the planner directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Absolute path of the record file for a planner directory
    pub fn store_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.store.trim())
    }

    fn validate(&self) -> Result<()> {
        if self.store.trim().is_empty() {
            return Err(Error::InvalidConfig("store cannot be empty".to_string()));
        }
        if self.locking.timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "locking.timeout_ms must be > 0".to_string(),
            ));
        }
        if self.locking.timeout_ms > MAX_LOCK_TIMEOUT_MS {
            return Err(Error::InvalidConfig(format!(
                "locking.timeout_ms must be <= {MAX_LOCK_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}
