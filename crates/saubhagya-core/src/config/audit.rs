//! Audit logging configuration.

use serde::{Deserialize, Serialize};

/// Configuration for audit logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Whether audit logging is enabled at startup.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Execution mode. Remote forwarding only happens in production.
    #[serde(default)]
    pub mode: ExecutionMode,

    /// Maximum number of events kept in memory.
    #[serde(default = "default_max_events")]
    pub max_events: usize,

    /// Number of most recent events written to durable storage.
    #[serde(default = "default_persist_limit")]
    pub persist_limit: usize,

    /// Upper bound on a single geolocation lookup.
    #[serde(default = "default_geolocation_timeout_ms")]
    pub geolocation_timeout_ms: u64,

    /// Durable storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Remote collection endpoint.
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Execution mode of the running process.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Development,
    Production,
}

impl ExecutionMode {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::str::FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            other => Err(format!("unknown execution mode: {other}")),
        }
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend type.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Path of the persisted slot (for file backend).
    #[serde(default = "default_storage_path")]
    pub path: String,
}

/// Storage backend type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// A single JSON file holding the trailing window.
    #[default]
    File,
    /// In-process slot, lost on exit.
    Memory,
    /// Persist nothing.
    None,
}

/// Remote audit collection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the collector, e.g. "https://api.example.com".
    #[serde(default = "default_remote_base_url")]
    pub base_url: String,

    /// Path joined onto `base_url`.
    #[serde(default = "default_remote_path")]
    pub path: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_remote_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            mode: ExecutionMode::default(),
            max_events: default_max_events(),
            persist_limit: default_persist_limit(),
            geolocation_timeout_ms: default_geolocation_timeout_ms(),
            storage: StorageConfig::default(),
            remote: RemoteConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_remote_base_url(),
            path: default_remote_path(),
            timeout_ms: default_remote_timeout_ms(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_max_events() -> usize {
    10_000
}

fn default_persist_limit() -> usize {
    1_000
}

fn default_geolocation_timeout_ms() -> u64 {
    1_000
}

fn default_storage_path() -> String {
    "data/audit-events.json".to_string()
}

fn default_remote_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_remote_path() -> String {
    "/api/audit-logs".to_string()
}

fn default_remote_timeout_ms() -> u64 {
    5_000
}
