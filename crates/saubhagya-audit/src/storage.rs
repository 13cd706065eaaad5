//! Durable storage for the trailing window of audit events.
//!
//! A backend holds one slot: the JSON array of the most recent events. The
//! slot is read once when the logger is built and overwritten after every
//! logged event.

use async_trait::async_trait;
use saubhagya_core::{StorageBackend, StorageConfig};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::error::AuditError;
use crate::event::AuditEvent;

/// Trait for audit storage backends.
#[async_trait]
pub trait AuditStorage: Send + Sync {
    /// Backend name, used in log lines.
    fn name(&self) -> &str;

    /// Read the persisted slot. An absent slot is an empty list.
    async fn load(&self) -> Result<Vec<AuditEvent>, AuditError>;

    /// Replace the persisted slot with `events`.
    async fn save(&self, events: &[AuditEvent]) -> Result<(), AuditError>;

    /// Remove the persisted slot.
    async fn clear(&self) -> Result<(), AuditError>;
}

/// Create a storage backend based on configuration.
pub fn create_storage(config: &StorageConfig) -> Arc<dyn AuditStorage> {
    match config.backend {
        StorageBackend::File => Arc::new(FileStorage::new(&config.path)),
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        StorageBackend::None => Arc::new(NullStorage),
    }
}

/// Persists nothing and loads nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStorage;

#[async_trait]
impl AuditStorage for NullStorage {
    fn name(&self) -> &str {
        "null"
    }

    async fn load(&self) -> Result<Vec<AuditEvent>, AuditError> {
        Ok(vec![])
    }

    async fn save(&self, _events: &[AuditEvent]) -> Result<(), AuditError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuditError> {
        Ok(())
    }
}

/// In-process slot.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: RwLock<Option<Vec<AuditEvent>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-filled with events from a previous session.
    pub fn with_events(events: Vec<AuditEvent>) -> Self {
        Self {
            slot: RwLock::new(Some(events)),
        }
    }

    /// Whether a slot is currently persisted.
    pub fn is_persisted(&self) -> bool {
        self.slot.read().map(|slot| slot.is_some()).unwrap_or(false)
    }

    /// Number of events currently in the slot.
    pub fn persisted_len(&self) -> usize {
        self.slot
            .read()
            .map(|slot| slot.as_ref().map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

#[async_trait]
impl AuditStorage for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self) -> Result<Vec<AuditEvent>, AuditError> {
        let slot = self
            .slot
            .read()
            .map_err(|e| AuditError::StorageError(format!("Failed to acquire read lock: {}", e)))?;
        Ok(slot.clone().unwrap_or_default())
    }

    async fn save(&self, events: &[AuditEvent]) -> Result<(), AuditError> {
        let mut slot = self
            .slot
            .write()
            .map_err(|e| AuditError::StorageError(format!("Failed to acquire write lock: {}", e)))?;
        *slot = Some(events.to_vec());
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuditError> {
        let mut slot = self
            .slot
            .write()
            .map_err(|e| AuditError::StorageError(format!("Failed to acquire write lock: {}", e)))?;
        *slot = None;
        Ok(())
    }
}

/// File storage: one JSON array file, rewritten on every save.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage. Nothing is touched until the first save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl AuditStorage for FileStorage {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self) -> Result<Vec<AuditEvent>, AuditError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(vec![]);
        }

        Ok(serde_json::from_str(&raw)?)
    }

    async fn save(&self, events: &[AuditEvent]) -> Result<(), AuditError> {
        let json = serde_json::to_vec(events)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Write-then-rename: readers never see a partial slot
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), AuditError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
