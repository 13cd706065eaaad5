//! Ambient identity and session lookup.
//!
//! The authentication subsystem owns the session; the logger only reads a
//! [`SessionSnapshot`] once per event through a [`SessionProvider`].

use serde::{Deserialize, Serialize};
use std::env;

/// Identity and session context captured when an event is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub user_role: Option<String>,
    pub organization_id: Option<String>,
    pub session_id: Option<String>,
    /// Bearer token for the remote collector. Never written into events.
    #[serde(skip_serializing)]
    pub auth_token: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// Source of the current identity.
///
/// Implementations must not fail: anything they cannot resolve is `None`.
pub trait SessionProvider: Send + Sync {
    fn snapshot(&self) -> SessionSnapshot;
}

/// No identity at all; events are recorded as anonymous.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousSession;

impl SessionProvider for AnonymousSession {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::default()
    }
}

/// A fixed snapshot, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSession(pub SessionSnapshot);

impl StaticSession {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self(SessionSnapshot {
            user_id: Some(user_id.into()),
            ..Default::default()
        })
    }
}

impl SessionProvider for StaticSession {
    fn snapshot(&self) -> SessionSnapshot {
        self.0.clone()
    }
}

/// Reads the session from `SAUBHAGYA_*` environment variables on every call.
pub struct EnvSession {
    lookup: Box<dyn Fn(&str) -> Option<String> + Send + Sync>,
}

impl EnvSession {
    pub const USER_ID: &'static str = "SAUBHAGYA_USER_ID";
    pub const USER_EMAIL: &'static str = "SAUBHAGYA_USER_EMAIL";
    pub const USER_ROLE: &'static str = "SAUBHAGYA_USER_ROLE";
    pub const ORGANIZATION_ID: &'static str = "SAUBHAGYA_ORGANIZATION_ID";
    pub const SESSION_ID: &'static str = "SAUBHAGYA_SESSION_ID";
    pub const AUTH_TOKEN: &'static str = "SAUBHAGYA_AUTH_TOKEN";
    pub const USER_AGENT: &'static str = "SAUBHAGYA_USER_AGENT";
    pub const IP_ADDRESS: &'static str = "SAUBHAGYA_IP_ADDRESS";

    /// Read from the process environment.
    pub fn new() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }
}

impl Default for EnvSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EnvSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSession").finish_non_exhaustive()
    }
}

impl SessionProvider for EnvSession {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user_id: self.get(Self::USER_ID),
            user_email: self.get(Self::USER_EMAIL),
            user_role: self.get(Self::USER_ROLE),
            organization_id: self.get(Self::ORGANIZATION_ID),
            session_id: self.get(Self::SESSION_ID),
            auth_token: self.get(Self::AUTH_TOKEN),
            user_agent: self.get(Self::USER_AGENT),
            ip_address: self.get(Self::IP_ADDRESS),
        }
    }
}
