//! Configuration loading and typed config structures.
//!
//! The configuration lives in `clicker-config.yaml`. Every section and
//! field has a default, so a missing file, an empty file, and a file that
//! only sets one value are all valid.
//!
//! ```yaml
//! session:
//!   tick_interval_ms: 1000
//!   save_debounce_ms: 500
//! persistence:
//!   path: clicker-save.json
//!   unknown_upgrades: preserve   # or: prune
//! logging:
//!   level: info
//!   status_interval_secs: 30     # 0 disables the periodic status line
//! catalog:                       # optional; omit for the built-in upgrades
//!   - id: upgrade1_cpc
//!     name: Better Clicker
//!     kind: cpc
//!     effect_per_level: 1
//!     base_cost: 10
//!     cost_growth_factor: 1.2
//!     max_level: 50
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use clicker_economy::{CatalogError, UnknownUpgradePolicy, UpgradeCatalog};
use clicker_types::UpgradeDefinition;
use serde::Deserialize;

/// Environment variable that overrides `persistence.path`.
pub const SAVE_PATH_ENV: &str = "CLICKER_SAVE_PATH";

/// Errors that can occur when loading configuration.
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
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClickerConfig {
    /// Timer settings for the session loop.
    #[serde(default)]
    pub session: SessionConfig,

    /// Where and how state is persisted.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Upgrade definitions replacing the built-in catalog.
    #[serde(default)]
    pub catalog: Option<Vec<UpgradeDefinition>>,
}

impl ClickerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `CLICKER_SAVE_PATH` overrides `persistence.path` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to `()`, not to a map.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.persistence.apply_env_overrides();
        Ok(config)
    }

    /// Build the upgrade catalog: the configured list, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if a configured definition is invalid.
    pub fn build_catalog(&self) -> Result<UpgradeCatalog, CatalogError> {
        match &self.catalog {
            Some(definitions) => UpgradeCatalog::new(definitions.clone()),
            None => Ok(UpgradeCatalog::builtin()),
        }
    }
}

/// Session loop timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Length of one time unit (one passive tick) in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Persistence batching window in milliseconds.
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,
}

impl SessionConfig {
    /// Tick period. Never zero.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Debounce window for persistence writes.
    pub const fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            save_debounce_ms: default_save_debounce_ms(),
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersistenceConfig {
    /// Save file location.
    #[serde(default = "default_save_path")]
    pub path: PathBuf,

    /// Whether saved levels for ids missing from the catalog are kept.
    #[serde(default)]
    pub unknown_upgrades: UnknownUpgradePolicy,
}

impl PersistenceConfig {
    /// Override the save path with `CLICKER_SAVE_PATH` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(SAVE_PATH_ENV) {
            self.path = PathBuf::from(val);
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            path: default_save_path(),
            unknown_upgrades: UnknownUpgradePolicy::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Seconds between periodic status lines. 0 disables them.
    #[serde(default = "default_status_interval_secs")]
    pub status_interval_secs: u64,
}

impl LoggingConfig {
    /// Status line period, or `None` when disabled.
    pub const fn status_interval(&self) -> Option<Duration> {
        if self.status_interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.status_interval_secs))
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            status_interval_secs: default_status_interval_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_tick_interval_ms() -> u64 {
    1_000
}

const fn default_save_debounce_ms() -> u64 {
    500
}

fn default_save_path() -> PathBuf {
    PathBuf::from("clicker-save.json")
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_status_interval_secs() -> u64 {
    30
}
