//! Filter queries over stored events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{AuditEvent, EventCategory, Outcome, Severity};

/// Filter for querying audit events. Every supplied predicate must hold.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFilter {
    /// Exact user id.
    pub user_id: Option<String>,
    /// Exact user role.
    pub user_role: Option<String>,
    /// Case-sensitive substring of the action.
    pub action: Option<String>,
    /// Case-sensitive substring of the resource.
    pub resource: Option<String>,
    pub category: Option<EventCategory>,
    pub severity: Option<Severity>,
    pub outcome: Option<Outcome>,
    /// Inclusive lower bound on the timestamp.
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the timestamp.
    pub date_to: Option<DateTime<Utc>>,
    /// Case-insensitive substring of action, resource, or serialized details.
    pub search_query: Option<String>,
}

impl AuditFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn user_role(mut self, role: impl Into<String>) -> Self {
        self.user_role = Some(role.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn category(mut self, category: EventCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn date_from(mut self, from: DateTime<Utc>) -> Self {
        self.date_from = Some(from);
        self
    }

    pub fn date_to(mut self, to: DateTime<Utc>) -> Self {
        self.date_to = Some(to);
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    /// Whether `event` satisfies every supplied predicate.
    pub fn matches(&self, event: &AuditEvent) -> bool {
        if let Some(ref user_id) = self.user_id {
            if &event.user_id != user_id {
                return false;
            }
        }
        if let Some(ref role) = self.user_role {
            if event.user_role.as_ref() != Some(role) {
                return false;
            }
        }
        if let Some(ref action) = self.action {
            if !event.action.contains(action.as_str()) {
                return false;
            }
        }
        if let Some(ref resource) = self.resource {
            if !event.resource.contains(resource.as_str()) {
                return false;
            }
        }
        if let Some(category) = self.category {
            if event.category != category {
                return false;
            }
        }
        if let Some(severity) = self.severity {
            if event.severity != severity {
                return false;
            }
        }
        if let Some(outcome) = self.outcome {
            if event.outcome != outcome {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if event.timestamp < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if event.timestamp > to {
                return false;
            }
        }
        if let Some(ref query) = self.search_query {
            if !matches_search(event, &query.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

fn matches_search(event: &AuditEvent, needle: &str) -> bool {
    if event.action.to_lowercase().contains(needle) || event.resource.to_lowercase().contains(needle)
    {
        return true;
    }
    serde_json::to_string(&event.details)
        .map(|json| json.to_lowercase().contains(needle))
        .unwrap_or(false)
}

/// Clone the events matching `filter` (all events without one), newest first.
pub fn select<'a, I>(events: I, filter: Option<&AuditFilter>) -> Vec<AuditEvent>
where
    I: IntoIterator<Item = &'a AuditEvent>,
{
    let mut results: Vec<AuditEvent> = events
        .into_iter()
        .filter(|e| filter.is_none_or(|f| f.matches(e)))
        .cloned()
        .collect();
    sort_newest_first(&mut results);
    results
}

/// Sort by timestamp descending.
pub fn sort_newest_first(events: &mut [AuditEvent]) {
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
