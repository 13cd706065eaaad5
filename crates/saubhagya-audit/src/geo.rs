//! Best-effort geolocation of the acting client.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::AuditError;
use crate::event::Location;
use crate::session::SessionSnapshot;

/// Resolves a [`Location`] for the current session.
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn locate(&self, session: &SessionSnapshot) -> Result<Option<Location>, AuditError>;
}

/// Never resolves a location.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLocator;

#[async_trait]
impl GeoLocator for NoopLocator {
    async fn locate(&self, _session: &SessionSnapshot) -> Result<Option<Location>, AuditError> {
        Ok(None)
    }
}

/// Always resolves the same location.
#[derive(Debug, Clone, Default)]
pub struct StaticLocator(pub Location);

#[async_trait]
impl GeoLocator for StaticLocator {
    async fn locate(&self, _session: &SessionSnapshot) -> Result<Option<Location>, AuditError> {
        Ok(Some(self.0.clone()))
    }
}

/// Run a lookup bounded by `timeout`. Errors and timeouts become `None`.
pub async fn resolve_location(
    locator: &dyn GeoLocator,
    session: &SessionSnapshot,
    timeout: Duration,
) -> Option<Location> {
    match tokio::time::timeout(timeout, locator.locate(session)).await {
        Ok(Ok(location)) => location,
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "geolocation lookup failed");
            None
        }
        Err(_) => {
            tracing::debug!(timeout_ms = timeout.as_millis() as u64, "geolocation lookup timed out");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingLocator;

    #[async_trait]
    impl GeoLocator for FailingLocator {
        async fn locate(&self, _session: &SessionSnapshot) -> Result<Option<Location>, AuditError> {
            Err(AuditError::GeolocationFailed("lookup service unavailable".into()))
        }
    }

    struct SlowLocator;

    #[async_trait]
    impl GeoLocator for SlowLocator {
        async fn locate(&self, _session: &SessionSnapshot) -> Result<Option<Location>, AuditError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Some(Location::default()))
        }
    }

    #[tokio::test]
    async fn test_failure_yields_none() {
        let session = SessionSnapshot::default();
        let location = resolve_location(&FailingLocator, &session, Duration::from_millis(100)).await;
        assert!(location.is_none());
    }

    #[tokio::test]
    async fn test_timeout_yields_none() {
        let session = SessionSnapshot::default();
        let location = resolve_location(&SlowLocator, &session, Duration::from_millis(20)).await;
        assert!(location.is_none());
    }

    #[tokio::test]
    async fn test_static_location() {
        let expected = Location {
            country: Some("IN".into()),
            region: Some("Uttar Pradesh".into()),
            city: Some("Mathura".into()),
        };
        let location = resolve_location(
            &StaticLocator(expected.clone()),
            &SessionSnapshot::default(),
            Duration::from_millis(100),
        )
        .await;
        assert_eq!(location, Some(expected));
    }
}
