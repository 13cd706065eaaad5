//! Audit event types.
//!
//! An [`AuditEvent`] records who did what to which resource, with the
//! acting identity snapshotted at creation time. Events are immutable once
//! built; the JSON form uses camelCase keys shared by the persisted slot, the
//! remote collector and JSON export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Open key/value diagnostic context attached to an event.
pub type Details = BTreeMap<String, serde_json::Value>;

/// User id recorded when no identity can be resolved.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Severity of an audit event, ordered `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Domain an audit event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Authentication,
    Authorization,
    DataAccess,
    DataModification,
    System,
    #[default]
    UserAction,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::DataAccess => "data_access",
            Self::DataModification => "data_modification",
            Self::System => "system",
            Self::UserAction => "user_action",
        }
    }
}

/// Result of the audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Success,
    Failure,
    Partial,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Partial => "partial",
        }
    }
}

macro_rules! impl_display_from_str {
    ($ty:ty, [$($variant:ident),+ $(,)?]) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case(Self::$variant.as_str()) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("unknown {}: {}", stringify!($ty), s))
            }
        }
    };
}

impl_display_from_str!(Severity, [Low, Medium, High, Critical]);
impl_display_from_str!(
    EventCategory,
    [Authentication, Authorization, DataAccess, DataModification, System, UserAction]
);
impl_display_from_str!(Outcome, [Success, Failure, Partial]);

/// Best-effort geolocation of the acting client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// An audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    /// Unique event ID (`audit_<millis>_<suffix>`).
    pub id: String,

    /// When the event occurred.
    pub timestamp: DateTime<Utc>,

    // ===== Acting identity, resolved once at creation =====
    /// Acting user, or [`ANONYMOUS_USER`].
    pub user_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,

    // ===== What happened =====
    /// Verb, e.g. "login", "create", "data_access".
    pub action: String,

    /// Resource type, e.g. "authentication", "cattle", "system".
    pub resource: String,

    /// Specific resource instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    /// Diagnostic context.
    #[serde(default)]
    pub details: Details,

    // ===== Network/session context =====
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    // ===== Classification =====
    pub severity: Severity,

    pub category: EventCategory,

    pub outcome: Outcome,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Extension data not covered by `details`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Details>,
}

impl AuditEvent {
    /// Create a new anonymous, low-severity user action event.
    pub fn new(action: impl Into<String>, resource: impl Into<String>) -> Self {
        let timestamp = Utc::now();
        Self {
            id: generate_event_id(timestamp),
            timestamp,
            user_id: ANONYMOUS_USER.to_string(),
            user_email: None,
            user_role: None,
            action: action.into(),
            resource: resource.into(),
            resource_id: None,
            details: Details::new(),
            ip_address: None,
            user_agent: None,
            session_id: None,
            organization_id: None,
            severity: Severity::default(),
            category: EventCategory::default(),
            outcome: Outcome::default(),
            location: None,
            metadata: None,
        }
    }

    /// Create a builder for an audit event.
    pub fn builder(action: impl Into<String>, resource: impl Into<String>) -> AuditEventBuilder {
        AuditEventBuilder::new(action, resource)
    }

    /// Whether this event belongs in the security view.
    pub fn is_security_relevant(&self) -> bool {
        self.category == EventCategory::Authorization || self.severity >= Severity::High
    }

    /// Format the event as a human-readable log line.
    ///
    /// Format: `[timestamp] SEVERITY category user=... action=... resource=...`
    pub fn to_log_line(&self) -> String {
        let mut line = format!(
            "[{}] {} {} user={} action={} resource={}",
            self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.severity.as_str().to_ascii_uppercase(),
            self.category,
            self.user_id,
            self.action,
            self.resource,
        );

        if let Some(ref resource_id) = self.resource_id {
            line.push_str(&format!(" resource_id={}", resource_id));
        }

        if let Some(ref role) = self.user_role {
            line.push_str(&format!(" role={}", role));
        }

        if self.outcome != Outcome::Success {
            line.push_str(&format!(" outcome={}", self.outcome));
        }

        if !self.details.is_empty() {
            let keys: Vec<&str> = self.details.keys().map(|k| k.as_str()).collect();
            line.push_str(&format!(" details=[{}]", keys.join(",")));
        }

        line
    }
}

/// Generate an event id from the creation time plus a random suffix.
pub fn generate_event_id(timestamp: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("audit_{}_{}", timestamp.timestamp_millis(), &suffix[..9])
}

/// Builder for creating audit events.
#[derive(Debug)]
pub struct AuditEventBuilder {
    event: AuditEvent,
}

impl AuditEventBuilder {
    /// Create a new builder with required fields.
    pub fn new(action: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            event: AuditEvent::new(action, resource),
        }
    }

    /// Set the acting user id. Empty ids fall back to [`ANONYMOUS_USER`].
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        if !user_id.is_empty() {
            self.event.user_id = user_id;
        }
        self
    }

    pub fn user_email(mut self, email: Option<String>) -> Self {
        self.event.user_email = email;
        self
    }

    pub fn user_role(mut self, role: Option<String>) -> Self {
        self.event.user_role = role;
        self
    }

    /// Set the resource instance id.
    pub fn resource_id(mut self, id: impl Into<String>) -> Self {
        self.event.resource_id = Some(id.into());
        self
    }

    pub fn details(mut self, details: Details) -> Self {
        self.event.details = details;
        self
    }

    /// Add a single detail entry.
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.event.details.insert(key.into(), value.into());
        self
    }

    pub fn ip_address(mut self, ip: Option<String>) -> Self {
        self.event.ip_address = ip;
        self
    }

    pub fn user_agent(mut self, agent: Option<String>) -> Self {
        self.event.user_agent = agent;
        self
    }

    pub fn session_id(mut self, id: Option<String>) -> Self {
        self.event.session_id = id;
        self
    }

    pub fn organization_id(mut self, id: Option<String>) -> Self {
        self.event.organization_id = id;
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.event.severity = severity;
        self
    }

    pub fn category(mut self, category: EventCategory) -> Self {
        self.event.category = category;
        self
    }

    pub fn outcome(mut self, outcome: Outcome) -> Self {
        self.event.outcome = outcome;
        self
    }

    pub fn location(mut self, location: Option<Location>) -> Self {
        self.event.location = location;
        self
    }

    pub fn metadata(mut self, metadata: Option<Details>) -> Self {
        self.event.metadata = metadata;
        self
    }

    /// Override the creation time. The id keeps the original time prefix.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.event.timestamp = timestamp;
        self
    }

    /// Build the audit event.
    pub fn build(self) -> AuditEvent {
        self.event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_defaults() {
        let event = AuditEvent::new("view", "cattle");

        assert!(event.id.starts_with("audit_"));
        assert_eq!(event.user_id, ANONYMOUS_USER);
        assert_eq!(event.severity, Severity::Low);
        assert_eq!(event.category, EventCategory::UserAction);
        assert_eq!(event.outcome, Outcome::Success);
        assert!(event.details.is_empty());
    }

    #[test]
    fn test_event_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..500).map(|_| AuditEvent::new("a", "b").id).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_event_builder() {
        let event = AuditEvent::builder("update", "cattle")
            .user_id("user-17")
            .user_role(Some("gaushala_manager".to_string()))
            .resource_id("cow-42")
            .detail("field", "weight")
            .severity(Severity::Medium)
            .category(EventCategory::DataModification)
            .build();

        assert_eq!(event.user_id, "user-17");
        assert_eq!(event.user_role.as_deref(), Some("gaushala_manager"));
        assert_eq!(event.resource_id.as_deref(), Some("cow-42"));
        assert_eq!(event.details.get("field"), Some(&json!("weight")));
        assert_eq!(event.category, EventCategory::DataModification);
    }

    #[test]
    fn test_empty_user_id_stays_anonymous() {
        let event = AuditEvent::builder("view", "dashboard").user_id("").build();
        assert_eq!(event.user_id, ANONYMOUS_USER);
    }

    #[test]
    fn test_serializes_camel_case_and_skips_absent() {
        let event = AuditEvent::builder("login", "authentication")
            .user_id("u1")
            .category(EventCategory::Authentication)
            .build();

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["category"], "authentication");
        assert_eq!(value["severity"], "low");
        assert!(value.get("userEmail").is_none());
        assert!(value.get("location").is_none());

        let back: AuditEvent = serde_json::from_value(value).unwrap();
        assert_eq!(back.id, event.id);
        assert_eq!(back.timestamp, event.timestamp);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_enum_parse() {
        assert_eq!("data_access".parse::<EventCategory>(), Ok(EventCategory::DataAccess));
        assert_eq!("CRITICAL".parse::<Severity>(), Ok(Severity::Critical));
        assert_eq!("partial".parse::<Outcome>(), Ok(Outcome::Partial));
        assert!("sideways".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_security_relevance() {
        assert!(AuditEvent::builder("deny", "system")
            .category(EventCategory::Authorization)
            .build()
            .is_security_relevant());
        assert!(AuditEvent::builder("delete", "cattle")
            .severity(Severity::High)
            .build()
            .is_security_relevant());
        assert!(!AuditEvent::builder("view", "cattle")
            .severity(Severity::Medium)
            .build()
            .is_security_relevant());
    }

    #[test]
    fn test_to_log_line() {
        let event = AuditEvent::builder("login_failed", "authentication")
            .user_id("u9")
            .severity(Severity::High)
            .category(EventCategory::Authentication)
            .outcome(Outcome::Failure)
            .detail("reason", "bad_password")
            .build();

        let line = event.to_log_line();
        assert!(line.contains("HIGH authentication"));
        assert!(line.contains("user=u9"));
        assert!(line.contains("action=login_failed"));
        assert!(line.contains("outcome=failure"));
        assert!(line.contains("details=[reason]"));
    }
}
