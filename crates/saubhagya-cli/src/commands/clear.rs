//! `saubhagya-audit clear` - drop all events and the persisted slot.

use anyhow::{bail, Result};
use saubhagya_audit::AuditLogger;

/// Clear the store. Irreversible, so `confirmed` must be set.
pub async fn run(logger: &AuditLogger, confirmed: bool) -> Result<usize> {
    if !confirmed {
        bail!("refusing to clear audit events without --yes");
    }
    let count = logger.len();
    logger.clear_events().await;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use saubhagya_audit::{AnonymousSession, Details, MemoryStorage};
    use saubhagya_core::AuditConfig;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_clear_requires_confirmation() {
        let storage = Arc::new(MemoryStorage::new());
        let logger = AuditLogger::builder(AuditConfig::default())
            .storage(storage.clone())
            .session(Arc::new(AnonymousSession))
            .build()
            .await
            .unwrap();
        logger.log_system_event("restart", Details::new()).await;

        assert!(run(&logger, false).await.is_err());
        assert_eq!(logger.len(), 1);

        assert_eq!(run(&logger, true).await.unwrap(), 1);
        assert!(logger.is_empty());
        assert!(!storage.is_persisted());
    }
}
