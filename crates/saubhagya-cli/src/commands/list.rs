//! `saubhagya-audit list`, `summary` and `security` - read-only views.

use anyhow::Result;
use saubhagya_audit::{AuditEvent, AuditFilter, AuditLogger};

/// One log line per matching event, newest first.
pub fn list(logger: &AuditLogger, filter: Option<&AuditFilter>, limit: Option<usize>) -> String {
    render(&logger.get_events(filter), limit)
}

/// Pretty JSON summary of the matching events.
pub fn summary(logger: &AuditLogger, filter: Option<&AuditFilter>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&logger.get_event_summary(filter))?)
}

/// Security-relevant events, newest first.
pub fn security(logger: &AuditLogger, limit: Option<usize>) -> String {
    render(&logger.get_security_events(), limit)
}

fn render(events: &[AuditEvent], limit: Option<usize>) -> String {
    let shown = limit.unwrap_or(events.len()).min(events.len());
    let mut out: Vec<String> = events[..shown].iter().map(AuditEvent::to_log_line).collect();
    if shown < events.len() {
        out.push(format!("... {} more", events.len() - shown));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use saubhagya_audit::{AnonymousSession, Details, EventCategory, MemoryStorage};
    use saubhagya_core::AuditConfig;
    use std::sync::Arc;

    async fn logger() -> AuditLogger {
        let logger = AuditLogger::builder(AuditConfig::default())
            .storage(Arc::new(MemoryStorage::new()))
            .session(Arc::new(AnonymousSession))
            .build()
            .await
            .unwrap();
        logger.log_system_event("restart", Details::new()).await;
        logger.log_security_event("token_reuse", Details::new()).await;
        logger.log_data_access("cattle", None, Details::new()).await;
        logger
    }

    #[tokio::test]
    async fn test_list_with_limit() {
        let logger = logger().await;
        let out = list(&logger, None, Some(2));
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "... 1 more");
    }

    #[tokio::test]
    async fn test_list_filtered() {
        let logger = logger().await;
        let filter = AuditFilter::new().category(EventCategory::System);
        let out = list(&logger, Some(&filter), None);
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("action=restart"));
    }

    #[tokio::test]
    async fn test_summary_json() {
        let logger = logger().await;
        let out = summary(&logger, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["total"], 3);
        assert_eq!(value["byCategory"]["authorization"], 1);
    }

    #[tokio::test]
    async fn test_security_view() {
        let logger = logger().await;
        let out = security(&logger, None);
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("action=token_reuse"));
    }
}
