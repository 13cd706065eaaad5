//! CLI command implementations for the Saubhagya audit store.

pub mod clear;
pub mod export;
pub mod list;
pub mod log;

use chrono::{DateTime, Utc};
use clap::Args;
use saubhagya_audit::{AuditFilter, EventCategory, Outcome, Severity};

/// Filter flags shared by `list`, `summary` and `export`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Exact user id
    #[arg(long = "user")]
    pub user_id: Option<String>,

    /// Exact user role
    #[arg(long = "role")]
    pub user_role: Option<String>,

    /// Substring of the action (case-sensitive)
    #[arg(long)]
    pub action: Option<String>,

    /// Substring of the resource (case-sensitive)
    #[arg(long)]
    pub resource: Option<String>,

    /// authentication | authorization | data_access | data_modification | system | user_action
    #[arg(long)]
    pub category: Option<EventCategory>,

    /// low | medium | high | critical
    #[arg(long)]
    pub severity: Option<Severity>,

    /// success | failure | partial
    #[arg(long)]
    pub outcome: Option<Outcome>,

    /// Earliest timestamp (RFC 3339), inclusive
    #[arg(long = "from")]
    pub date_from: Option<DateTime<Utc>>,

    /// Latest timestamp (RFC 3339), inclusive
    #[arg(long = "to")]
    pub date_to: Option<DateTime<Utc>>,

    /// Case-insensitive search over action, resource and details
    #[arg(long = "search")]
    pub search_query: Option<String>,
}

impl FilterArgs {
    /// `None` when no flag was given, so callers hit the unfiltered path.
    pub fn to_filter(&self) -> Option<AuditFilter> {
        let filter = AuditFilter {
            user_id: self.user_id.clone(),
            user_role: self.user_role.clone(),
            action: self.action.clone(),
            resource: self.resource.clone(),
            category: self.category,
            severity: self.severity,
            outcome: self.outcome,
            date_from: self.date_from,
            date_to: self.date_to,
            search_query: self.search_query.clone(),
        };

        let empty = filter.user_id.is_none()
            && filter.user_role.is_none()
            && filter.action.is_none()
            && filter.resource.is_none()
            && filter.category.is_none()
            && filter.severity.is_none()
            && filter.outcome.is_none()
            && filter.date_from.is_none()
            && filter.date_to.is_none()
            && filter.search_query.is_none();

        (!empty).then_some(filter)
    }
}
