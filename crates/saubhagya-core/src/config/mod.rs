//! Configuration types for the Saubhagya audit subsystem.
//!
//! Configuration is loaded from a YAML file (`saubhagya-audit.yaml` by
//! default) and then overridden from `SAUBHAGYA_*` environment variables.

pub mod audit;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use audit::{AuditConfig, ExecutionMode, RemoteConfig, StorageBackend, StorageConfig};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "SAUBHAGYA_AUDIT_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "saubhagya-audit.yaml";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuditConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Resolve the config file path from `SAUBHAGYA_AUDIT_CONFIG`, falling back
    /// to `saubhagya-audit.yaml` in the working directory.
    pub fn config_path() -> PathBuf {
        if let Ok(p) = env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(p);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration for a process.
    ///
    /// An explicit path must exist. Without one, the resolved default path is
    /// read if present and defaults are used otherwise. Environment overrides
    /// are applied last. Limits are checked when the logger is built.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `SAUBHAGYA_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Recognised keys: `SAUBHAGYA_AUDIT_ENABLED`, `SAUBHAGYA_ENV`,
    /// `SAUBHAGYA_AUDIT_STORAGE_PATH`, `SAUBHAGYA_AUDIT_REMOTE_URL`.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("SAUBHAGYA_AUDIT_ENABLED") {
            self.enabled = parse_bool(&raw).ok_or_else(|| {
                ConfigError::Config(format!("SAUBHAGYA_AUDIT_ENABLED: invalid boolean '{raw}'"))
            })?;
        }
        if let Some(raw) = lookup("SAUBHAGYA_ENV") {
            self.mode = raw
                .parse()
                .map_err(|e| ConfigError::Config(format!("SAUBHAGYA_ENV: {e}")))?;
        }
        if let Some(path) = lookup("SAUBHAGYA_AUDIT_STORAGE_PATH") {
            if !path.is_empty() {
                self.storage.path = path;
            }
        }
        if let Some(url) = lookup("SAUBHAGYA_AUDIT_REMOTE_URL") {
            if !url.is_empty() {
                self.remote.base_url = url;
            }
        }
        Ok(())
    }

    /// Reject settings the logger cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_events == 0 {
            return Err(ConfigError::Config("max_events must be greater than 0".into()));
        }
        if self.persist_limit > self.max_events {
            return Err(ConfigError::Config(format!(
                "persist_limit ({}) cannot exceed max_events ({})",
                self.persist_limit, self.max_events
            )));
        }
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
