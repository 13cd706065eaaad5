//! `saubhagya-audit log` - record one event from the command line.

use anyhow::{bail, Result};
use saubhagya_audit::{AuditLogger, Details, EventCategory, LogOptions, Outcome, Severity};
use serde_json::Value as JsonValue;
use std::time::Duration;

/// Arguments for a single recorded event.
#[derive(Debug, Clone)]
pub struct LogRequest {
    pub action: String,
    pub resource: String,
    pub resource_id: Option<String>,
    pub severity: Severity,
    pub category: EventCategory,
    pub outcome: Outcome,
    pub details: Vec<String>,
}

/// Record the event and return its id. In production the call also waits,
/// up to the remote timeout, for the event to reach the collector.
pub async fn run(logger: &AuditLogger, request: LogRequest) -> Result<String> {
    if !logger.is_enabled() {
        bail!("audit logging is disabled (check `enabled` or SAUBHAGYA_AUDIT_ENABLED)");
    }

    let details = parse_details(&request.details)?;

    let mut options = LogOptions::new()
        .severity(request.severity)
        .category(request.category)
        .outcome(request.outcome);
    if let Some(id) = request.resource_id {
        options = options.resource_id(id);
    }

    let id = logger
        .log(request.action, request.resource, details, options)
        .await;

    let timeout = Duration::from_millis(logger.config().remote.timeout_ms);
    logger.wait_for_forwards(timeout).await;

    Ok(id)
}

/// Parse `key=value` pairs. Values that parse as JSON keep their type.
pub fn parse_details(pairs: &[String]) -> Result<Details> {
    let mut details = Details::new();
    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            bail!("detail '{}' must be in key=value form", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("detail '{}' has an empty key", pair);
        }
        let value = serde_json::from_str::<JsonValue>(raw)
            .unwrap_or_else(|_| JsonValue::String(raw.to_string()));
        details.insert(key.to_string(), value);
    }
    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use saubhagya_audit::{AnonymousSession, NullStorage};
    use saubhagya_core::{AuditConfig, ExecutionMode, RemoteConfig};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_details_types() {
        let details = parse_details(&[
            "count=3".to_string(),
            "name=Gauri".to_string(),
            "ok=true".to_string(),
            "note=a=b".to_string(),
        ])
        .unwrap();

        assert_eq!(details["count"], json!(3));
        assert_eq!(details["name"], json!("Gauri"));
        assert_eq!(details["ok"], json!(true));
        assert_eq!(details["note"], json!("a=b"));
    }

    #[test]
    fn test_parse_details_rejects_malformed() {
        assert!(parse_details(&["novalue".to_string()]).is_err());
        assert!(parse_details(&["=x".to_string()]).is_err());
    }

    #[tokio::test]
    async fn test_run_records_event() {
        let logger = AuditLogger::builder(AuditConfig::default())
            .storage(Arc::new(NullStorage))
            .session(Arc::new(AnonymousSession))
            .build()
            .await
            .unwrap();

        let id = run(
            &logger,
            LogRequest {
                action: "update".into(),
                resource: "cattle".into(),
                resource_id: Some("cow-5".into()),
                severity: Severity::Medium,
                category: EventCategory::DataModification,
                outcome: Outcome::Success,
                details: vec!["weight=410".into()],
            },
        )
        .await
        .unwrap();

        let event = logger.get_event_by_id(&id).unwrap();
        assert_eq!(event.resource_id.as_deref(), Some("cow-5"));
        assert_eq!(event.details["weight"], json!(410));
    }

    #[tokio::test]
    async fn test_run_refuses_when_disabled() {
        let logger = AuditLogger::disabled();
        let request = LogRequest {
            action: "a".into(),
            resource: "b".into(),
            resource_id: None,
            severity: Severity::Low,
            category: EventCategory::UserAction,
            outcome: Outcome::Success,
            details: vec![],
        };
        assert!(run(&logger, request).await.is_err());
    }

    #[tokio::test]
    async fn test_run_waits_for_forward_in_production() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/audit-logs"))
            .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_millis(300)))
            .expect(1)
            .mount(&server)
            .await;

        let config = AuditConfig {
            mode: ExecutionMode::Production,
            remote: RemoteConfig {
                base_url: server.uri(),
                ..Default::default()
            },
            ..Default::default()
        };
        let logger = AuditLogger::builder(config)
            .storage(Arc::new(NullStorage))
            .session(Arc::new(AnonymousSession))
            .build()
            .await
            .unwrap();

        let request = LogRequest {
            action: "export".into(),
            resource: "cattle".into(),
            resource_id: None,
            severity: Severity::Low,
            category: EventCategory::DataAccess,
            outcome: Outcome::Success,
            details: vec![],
        };
        let id = run(&logger, request).await.unwrap();

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(body["id"], json!(id));
    }
}
