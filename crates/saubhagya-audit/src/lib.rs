//! # saubhagya-audit
//!
//! Audit logging for the Saubhagya administrative frontend.
//!
//! This crate provides functionality for:
//! - Capturing audit events enriched with the acting identity and session
//! - Keeping a bounded in-memory window (oldest evicted first)
//! - Persisting the most recent events to a durable slot
//! - Forwarding events to a remote collector in production (fire-and-forget)
//! - Querying, summarizing and exporting (JSON / CSV) stored events
//!
//! ## Event Taxonomy
//!
//! | Helper | Category | Severity | Outcome |
//! |--------|----------|----------|---------|
//! | `log_authentication` | `authentication` | `high` for `login_failed`, else `medium` | `failure` for `login_failed`, else `success` |
//! | `log_data_access` | `data_access` | `low` | `success` |
//! | `log_data_modification` | `data_modification` | `high` for `delete`, else `medium` | `success` |
//! | `log_system_event` | `system` | `medium` | `success` |
//! | `log_security_event` | `authorization` | `high` | `success` |
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use saubhagya_audit::{AuditFilter, AuditLogger, AuthAction, Details, ExportFormat};
//! use saubhagya_core::AuditConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // One logger per process, shared by handle
//! let logger = Arc::new(AuditLogger::new(AuditConfig::default()).await?);
//!
//! let mut details = Details::new();
//! details.insert("reason".into(), "bad_password".into());
//! logger.log_authentication(AuthAction::LoginFailed, details).await;
//!
//! let failures = logger.get_events(Some(&AuditFilter::new().resource("authentication")));
//! let csv = logger.export_events(None, ExportFormat::Csv)?;
//! # let _ = (failures, csv);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod event;
pub mod export;
pub mod filter;
pub mod forward;
pub mod geo;
pub mod logger;
pub mod session;
pub mod storage;
pub mod store;
pub mod summary;

pub use error::AuditError;
pub use event::{
    AuditEvent, AuditEventBuilder, Details, EventCategory, Location, Outcome, Severity,
    ANONYMOUS_USER,
};
pub use export::ExportFormat;
pub use filter::AuditFilter;
pub use forward::RemoteForwarder;
pub use geo::{GeoLocator, NoopLocator, StaticLocator};
pub use logger::{AuditLogger, AuditLoggerBuilder, AuthAction, LogOptions, ModificationAction};
pub use session::{AnonymousSession, EnvSession, SessionProvider, SessionSnapshot, StaticSession};
pub use storage::{AuditStorage, FileStorage, MemoryStorage, NullStorage};
pub use store::EventStore;
pub use summary::{ActionCount, EventSummary, UserCount};
