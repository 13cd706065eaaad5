//! Fire-and-forget forwarding to the remote audit collector.

use reqwest::Url;
use saubhagya_core::RemoteConfig;
use std::sync::Arc;
use std::time::Duration;

use crate::error::AuditError;
use crate::event::AuditEvent;

/// POSTs events to `<base_url><path>` as JSON.
#[derive(Debug, Clone)]
pub struct RemoteForwarder {
    endpoint: Url,
    http: reqwest::Client,
}

impl RemoteForwarder {
    pub fn new(config: &RemoteConfig) -> Result<Self, AuditError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Self::with_client(config, http)
    }

    pub fn with_client(config: &RemoteConfig, http: reqwest::Client) -> Result<Self, AuditError> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            AuditError::InitializationFailed(format!("invalid remote base_url '{}': {e}", config.base_url))
        })?;
        let endpoint = base.join(&config.path).map_err(|e| {
            AuditError::InitializationFailed(format!("invalid remote path '{}': {e}", config.path))
        })?;
        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one event. Non-2xx responses are errors; the body is ignored.
    pub async fn send(&self, event: &AuditEvent, auth_token: Option<&str>) -> Result<(), AuditError> {
        let mut req = self.http.post(self.endpoint.clone()).json(event);
        if let Some(token) = auth_token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::ForwardFailed(format!(
                "collector responded with {}",
                status
            )));
        }
        Ok(())
    }

    /// Send on a detached task. Failures are logged and dropped.
    pub fn spawn_send(
        self: &Arc<Self>,
        event: AuditEvent,
        auth_token: Option<String>,
    ) -> tokio::task::JoinHandle<()> {
        let forwarder = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = forwarder.send(&event, auth_token.as_deref()).await {
                tracing::warn!(
                    event_id = %event.id,
                    endpoint = %forwarder.endpoint,
                    error = %e,
                    "failed to forward audit event"
                );
            }
        })
    }
}
