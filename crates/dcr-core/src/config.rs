use crate::error::{DcrError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for DCR
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Root directory of the file-backed local store
    pub storage_dir: ConfigValue<PathBuf>,

    /// Base URL of the remote document store; `None` runs offline-only
    pub remote_url: ConfigValue<Option<String>>,

    /// Per-request timeout for the remote store, in seconds
    pub remote_timeout_secs: ConfigValue<u64>,

    /// User recorded as author when the caller does not name one
    pub default_user: ConfigValue<String>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            storage_dir: ConfigValue::new(PathBuf::from(".dcr"), ConfigSource::Default),
            remote_url: ConfigValue::new(None, ConfigSource::Default),
            remote_timeout_secs: ConfigValue::new(10, ConfigSource::Default),
            default_user: ConfigValue::new("field-user".to_string(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| DcrError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("Failed to read config file: {}", e),
        })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| DcrError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(storage_dir) = file_config.storage_dir {
            self.storage_dir.update(storage_dir, ConfigSource::File);
        }

        if let Some(remote_url) = file_config.remote_url {
            self.remote_url.update(Some(remote_url), ConfigSource::File);
        }

        if let Some(timeout) = file_config.remote_timeout_secs {
            self.remote_timeout_secs.update(timeout, ConfigSource::File);
        }

        if let Some(default_user) = file_config.default_user {
            self.default_user.update(default_user, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // DCR_STORAGE_DIR
        if let Ok(dir) = env::var("DCR_STORAGE_DIR") {
            self.storage_dir.update(PathBuf::from(dir), ConfigSource::Environment);
        }

        // DCR_REMOTE_URL
        if let Ok(url) = env::var("DCR_REMOTE_URL") {
            self.remote_url.update(Some(url), ConfigSource::Environment);
        }

        // DCR_REMOTE_TIMEOUT_SECS
        if let Ok(timeout_str) = env::var("DCR_REMOTE_TIMEOUT_SECS") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) => self.remote_timeout_secs.update(timeout, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid DCR_REMOTE_TIMEOUT_SECS value '{}': expected whole seconds",
                    timeout_str
                ),
            }
        }

        // DCR_DEFAULT_USER
        if let Ok(user) = env::var("DCR_DEFAULT_USER") {
            self.default_user.update(user, ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(storage_dir) = overrides.storage_dir {
            self.storage_dir.update(storage_dir, ConfigSource::Cli);
        }

        if let Some(remote_url) = overrides.remote_url {
            self.remote_url.update(Some(remote_url), ConfigSource::Cli);
        }

        if overrides.offline {
            self.remote_url.update(None, ConfigSource::Cli);
        }

        if let Some(user) = overrides.user {
            self.default_user.update(user, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "storage_dir".to_string(),
            (self.storage_dir.value.display().to_string(), self.storage_dir.source),
        );

        map.insert(
            "remote_url".to_string(),
            (
                self.remote_url.value.clone().unwrap_or_else(|| "(offline)".to_string()),
                self.remote_url.source,
            ),
        );

        map.insert(
            "remote_timeout_secs".to_string(),
            (self.remote_timeout_secs.value.to_string(), self.remote_timeout_secs.source),
        );

        map.insert(
            "default_user".to_string(),
            (self.default_user.value.clone(), self.default_user.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    storage_dir: Option<PathBuf>,
    remote_url: Option<String>,
    remote_timeout_secs: Option<u64>,
    default_user: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub storage_dir: Option<PathBuf>,
    pub remote_url: Option<String>,
    pub offline: bool,
    pub user: Option<String>,
}
