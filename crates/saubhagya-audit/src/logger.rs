//! Audit logger implementation.
//!
//! Provides the main `AuditLogger` type with helper methods for logging
//! authentication, data access, data modification, system and security
//! events, plus the query, summary and export read paths.

use saubhagya_core::AuditConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::error::AuditError;
use crate::event::{AuditEvent, Details, EventCategory, Outcome, Severity};
use crate::export::{self, ExportFormat};
use crate::filter::{self, AuditFilter};
use crate::forward::RemoteForwarder;
use crate::geo::{self, GeoLocator, NoopLocator};
use crate::session::{AnonymousSession, EnvSession, SessionProvider};
use crate::storage::{self, AuditStorage, NullStorage};
use crate::store::EventStore;
use crate::summary::EventSummary;

/// Per-call options for [`AuditLogger::log`].
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub resource_id: Option<String>,
    pub severity: Severity,
    pub category: EventCategory,
    pub outcome: Outcome,
    pub metadata: Option<Details>,
}

impl LogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn category(mut self, category: EventCategory) -> Self {
        self.category = category;
        self
    }

    pub fn outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn metadata(mut self, metadata: Details) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Authentication actions accepted by [`AuditLogger::log_authentication`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Logout,
    LoginFailed,
    PasswordReset,
}

impl AuthAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::LoginFailed => "login_failed",
            Self::PasswordReset => "password_reset",
        }
    }
}

/// Modification actions accepted by [`AuditLogger::log_data_modification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModificationAction {
    Create,
    Update,
    Delete,
}

impl ModificationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// The main audit logger.
///
/// One logger is built per process and shared by reference (usually as
/// `Arc<AuditLogger>`). It owns the in-memory store; the storage backend only
/// ever sees the trailing `persist_limit` events.
pub struct AuditLogger {
    config: AuditConfig,
    enabled: AtomicBool,
    store: RwLock<EventStore>,
    /// Held from taking the trailing window until the backend write returns,
    /// so slot writes land in store order.
    slot: tokio::sync::Mutex<()>,
    storage: Arc<dyn AuditStorage>,
    session: Arc<dyn SessionProvider>,
    locator: Arc<dyn GeoLocator>,
    forwarder: Option<Arc<RemoteForwarder>>,
    forwards: Mutex<Vec<JoinHandle<()>>>,
}

impl AuditLogger {
    /// Create a logger from configuration, reading identity from the
    /// environment and hydrating from the configured storage backend.
    pub async fn new(config: AuditConfig) -> Result<Self, AuditError> {
        Self::builder(config).build().await
    }

    /// Start building a logger with custom collaborators.
    pub fn builder(config: AuditConfig) -> AuditLoggerBuilder {
        AuditLoggerBuilder::new(config)
    }

    /// Create a disabled (no-op) logger.
    pub fn disabled() -> Self {
        let config = AuditConfig {
            enabled: false,
            ..Default::default()
        };
        Self {
            enabled: AtomicBool::new(false),
            store: RwLock::new(EventStore::new(config.max_events)),
            slot: tokio::sync::Mutex::new(()),
            storage: Arc::new(NullStorage),
            session: Arc::new(AnonymousSession),
            locator: Arc::new(NoopLocator),
            forwarder: None,
            forwards: Mutex::new(Vec::new()),
            config,
        }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Check if logging is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Turn logging on or off for the whole process.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        tracing::info!(enabled, "audit logging toggled");
    }

    fn read_store(&self) -> RwLockReadGuard<'_, EventStore> {
        self.store.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, EventStore> {
        self.store.write().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_forwards(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.forwards.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record an audit event and return its id.
    ///
    /// Returns an empty string without side effects while disabled. Storage,
    /// geolocation and forwarding failures are logged and never returned.
    pub async fn log(
        &self,
        action: impl Into<String>,
        resource: impl Into<String>,
        details: Details,
        options: LogOptions,
    ) -> String {
        if !self.is_enabled() {
            return String::new();
        }

        let session = self.session.snapshot();
        let location = geo::resolve_location(
            self.locator.as_ref(),
            &session,
            Duration::from_millis(self.config.geolocation_timeout_ms),
        )
        .await;

        let mut builder = AuditEvent::builder(action, resource)
            .user_id(session.user_id.clone().unwrap_or_default())
            .user_email(session.user_email.clone())
            .user_role(session.user_role.clone())
            .details(details)
            .ip_address(session.ip_address.clone())
            .user_agent(session.user_agent.clone())
            .session_id(session.session_id.clone())
            .organization_id(session.organization_id.clone())
            .severity(options.severity)
            .category(options.category)
            .outcome(options.outcome)
            .location(location)
            .metadata(options.metadata);
        if let Some(resource_id) = options.resource_id {
            builder = builder.resource_id(resource_id);
        }
        let event = builder.build();
        let event_id = event.id.clone();

        tracing::debug!(
            event_id = %event.id,
            action = %event.action,
            resource = %event.resource,
            category = %event.category,
            severity = %event.severity,
            "Audit event"
        );

        {
            let _slot = self.slot.lock().await;
            let trailing = {
                let mut store = self.write_store();
                let evicted = store.push(event.clone());
                if evicted > 0 {
                    tracing::trace!(evicted, capacity = store.capacity(), "evicted oldest audit events");
                }
                store.trailing(self.config.persist_limit)
            };

            if let Err(e) = self.storage.save(&trailing).await {
                tracing::warn!(
                    backend = self.storage.name(),
                    error = %e,
                    "failed to persist audit events"
                );
            }
        }

        if self.config.mode.is_production() {
            if let Some(ref forwarder) = self.forwarder {
                let handle = forwarder.spawn_send(event.clone(), session.auth_token.clone());
                let mut forwards = self.lock_forwards();
                forwards.retain(|h| !h.is_finished());
                forwards.push(handle);
            }
        }

        if event.severity == Severity::Critical {
            tracing::warn!(event = ?event, "Critical audit event");
        }

        event_id
    }

    /// Log an authentication event.
    pub async fn log_authentication(&self, action: AuthAction, details: Details) -> String {
        let failed = action == AuthAction::LoginFailed;
        let options = LogOptions::new()
            .category(EventCategory::Authentication)
            .severity(if failed { Severity::High } else { Severity::Medium })
            .outcome(if failed { Outcome::Failure } else { Outcome::Success });

        self.log(action.as_str(), "authentication", details, options).await
    }

    /// Log a read of `resource`.
    pub async fn log_data_access(
        &self,
        resource: &str,
        resource_id: Option<&str>,
        details: Details,
    ) -> String {
        let mut options = LogOptions::new()
            .category(EventCategory::DataAccess)
            .severity(Severity::Low);
        if let Some(id) = resource_id {
            options = options.resource_id(id);
        }

        self.log("data_access", resource, details, options).await
    }

    /// Log a create, update or delete of a resource instance.
    pub async fn log_data_modification(
        &self,
        action: ModificationAction,
        resource: &str,
        resource_id: &str,
        details: Details,
    ) -> String {
        let severity = if action == ModificationAction::Delete {
            Severity::High
        } else {
            Severity::Medium
        };
        let options = LogOptions::new()
            .category(EventCategory::DataModification)
            .severity(severity)
            .resource_id(resource_id);

        self.log(action.as_str(), resource, details, options).await
    }

    /// Log a system event.
    pub async fn log_system_event(&self, action: &str, details: Details) -> String {
        let options = LogOptions::new()
            .category(EventCategory::System)
            .severity(Severity::Medium);

        self.log(action, "system", details, options).await
    }

    /// Log a security event.
    pub async fn log_security_event(&self, action: &str, details: Details) -> String {
        let options = LogOptions::new()
            .category(EventCategory::Authorization)
            .severity(Severity::High);

        self.log(action, "security", details, options).await
    }

    /// Query events, newest first.
    pub fn get_events(&self, filter: Option<&AuditFilter>) -> Vec<AuditEvent> {
        let store = self.read_store();
        filter::select(store.iter(), filter)
    }

    /// Get an audit event by ID.
    pub fn get_event_by_id(&self, id: &str) -> Option<AuditEvent> {
        self.read_store().iter().find(|e| e.id == id).cloned()
    }

    /// Get all events by one user, newest first.
    pub fn get_events_by_user(&self, user_id: &str) -> Vec<AuditEvent> {
        self.get_events(Some(&AuditFilter::new().user_id(user_id)))
    }

    /// Get events for a resource type, optionally narrowed to one instance.
    pub fn get_events_by_resource(&self, resource: &str, resource_id: Option<&str>) -> Vec<AuditEvent> {
        let mut events = self.get_events(Some(&AuditFilter::new().resource(resource)));
        if let Some(id) = resource_id {
            events.retain(|e| e.resource_id.as_deref() == Some(id));
        }
        events
    }

    /// Authorization events plus anything of high or critical severity.
    /// Each event appears once.
    pub fn get_security_events(&self) -> Vec<AuditEvent> {
        let store = self.read_store();
        let mut events: Vec<AuditEvent> = store
            .iter()
            .filter(|e| e.is_security_relevant())
            .cloned()
            .collect();
        filter::sort_newest_first(&mut events);
        events
    }

    /// Summarize the events matching `filter`.
    pub fn get_event_summary(&self, filter: Option<&AuditFilter>) -> EventSummary {
        EventSummary::from_events(&self.get_events(filter))
    }

    /// Serialize the events matching `filter`.
    pub fn export_events(
        &self,
        filter: Option<&AuditFilter>,
        format: ExportFormat,
    ) -> Result<String, AuditError> {
        export::export(&self.get_events(filter), format)
    }

    /// Wait up to `timeout` for forwards still in flight.
    ///
    /// Returns `false` if some were still running when the timeout elapsed;
    /// those keep running detached.
    pub async fn wait_for_forwards(&self, timeout: Duration) -> bool {
        let handles = std::mem::take(&mut *self.lock_forwards());
        if handles.is_empty() {
            return true;
        }

        let pending = handles.len();
        let joined = tokio::time::timeout(timeout, async move {
            for handle in handles {
                let _ = handle.await;
            }
        })
        .await;

        if joined.is_err() {
            tracing::warn!(pending, "timed out waiting for audit events to forward");
        }
        joined.is_ok()
    }

    /// Drop every in-memory event and remove the persisted slot.
    pub async fn clear_events(&self) {
        let _slot = self.slot.lock().await;
        let cleared = {
            let mut store = self.write_store();
            let n = store.len();
            store.clear();
            n
        };

        if let Err(e) = self.storage.clear().await {
            tracing::warn!(
                backend = self.storage.name(),
                error = %e,
                "failed to clear persisted audit events"
            );
        }

        tracing::info!(cleared, "audit events cleared");
    }

    /// Number of events held in memory.
    pub fn len(&self) -> usize {
        self.read_store().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_store().is_empty()
    }
}

/// Builder for [`AuditLogger`].
pub struct AuditLoggerBuilder {
    config: AuditConfig,
    storage: Option<Arc<dyn AuditStorage>>,
    session: Option<Arc<dyn SessionProvider>>,
    locator: Option<Arc<dyn GeoLocator>>,
    forwarder: Option<Arc<RemoteForwarder>>,
}

impl AuditLoggerBuilder {
    pub fn new(config: AuditConfig) -> Self {
        Self {
            config,
            storage: None,
            session: None,
            locator: None,
            forwarder: None,
        }
    }

    /// Use a custom storage backend instead of the configured one.
    pub fn storage(mut self, storage: Arc<dyn AuditStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Use a custom identity source instead of [`EnvSession`].
    pub fn session(mut self, session: Arc<dyn SessionProvider>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn locator(mut self, locator: Arc<dyn GeoLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Use a custom forwarder instead of one built from `config.remote`.
    pub fn forwarder(mut self, forwarder: RemoteForwarder) -> Self {
        self.forwarder = Some(Arc::new(forwarder));
        self
    }

    /// Build the logger and hydrate it from the storage backend.
    pub async fn build(self) -> Result<AuditLogger, AuditError> {
        let config = self.config;
        config
            .validate()
            .map_err(|e| AuditError::InitializationFailed(e.to_string()))?;

        let storage = self
            .storage
            .unwrap_or_else(|| storage::create_storage(&config.storage));

        let forwarder = match self.forwarder {
            Some(forwarder) => Some(forwarder),
            None if config.mode.is_production() => {
                Some(Arc::new(RemoteForwarder::new(&config.remote)?))
            }
            None => None,
        };

        let persisted = match storage.load().await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(
                    backend = storage.name(),
                    error = %e,
                    "failed to load persisted audit events, starting empty"
                );
                Vec::new()
            }
        };
        tracing::info!(
            backend = storage.name(),
            hydrated = persisted.len(),
            "audit logger ready"
        );

        Ok(AuditLogger {
            enabled: AtomicBool::new(config.enabled),
            store: RwLock::new(EventStore::hydrate(config.max_events, persisted)),
            slot: tokio::sync::Mutex::new(()),
            storage,
            session: self.session.unwrap_or_else(|| Arc::new(EnvSession::new())),
            locator: self.locator.unwrap_or_else(|| Arc::new(NoopLocator)),
            forwarder,
            forwards: Mutex::new(Vec::new()),
            config,
        })
    }
}
