//! Error types for the audit crate.

use thiserror::Error;

/// Errors that can occur during audit operations.
///
/// Only construction and export surface these to callers. Storage, network
/// and geolocation failures on the logging path are logged and dropped.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Failed to initialize the audit logger.
    #[error("failed to initialize audit logger: {0}")]
    InitializationFailed(String),

    /// Storage error.
    #[error("storage error: {0}")]
    StorageError(String),

    /// Remote forwarding failed.
    #[error("failed to forward audit event: {0}")]
    ForwardFailed(String),

    /// Geolocation lookup failed.
    #[error("geolocation failed: {0}")]
    GeolocationFailed(String),

    /// Failed to export events.
    #[error("failed to export audit events: {0}")]
    ExportFailed(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
