//! Configuration types shared across all Saubhagya crates.

pub mod config;

pub use config::{
    AuditConfig, ConfigError, ExecutionMode, RemoteConfig, StorageBackend, StorageConfig,
};
