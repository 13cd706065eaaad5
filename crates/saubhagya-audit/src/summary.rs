//! Aggregate counts over a set of events.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::event::{AuditEvent, EventCategory, Outcome, Severity};

/// Number of entries kept in the top-user and top-action lists.
pub const TOP_N: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCount {
    pub user_id: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCount {
    pub action: String,
    pub count: usize,
}

/// Counts over a filtered event set. Maps only contain observed keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub total: usize,
    pub by_category: BTreeMap<EventCategory, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_outcome: BTreeMap<Outcome, usize>,
    pub top_users: Vec<UserCount>,
    pub top_actions: Vec<ActionCount>,
}

impl EventSummary {
    /// Summarize `events`. Ties in the top lists keep first-seen order.
    pub fn from_events(events: &[AuditEvent]) -> Self {
        let mut summary = Self {
            total: events.len(),
            ..Default::default()
        };

        let mut users = Counter::default();
        let mut actions = Counter::default();

        for event in events {
            *summary.by_category.entry(event.category).or_default() += 1;
            *summary.by_severity.entry(event.severity).or_default() += 1;
            *summary.by_outcome.entry(event.outcome).or_default() += 1;
            users.add(&event.user_id);
            actions.add(&event.action);
        }

        summary.top_users = users
            .top(TOP_N)
            .into_iter()
            .map(|(user_id, count)| UserCount { user_id, count })
            .collect();
        summary.top_actions = actions
            .top(TOP_N)
            .into_iter()
            .map(|(action, count)| ActionCount { action, count })
            .collect();

        summary
    }
}

/// Insertion-ordered occurrence counter.
#[derive(Default)]
struct Counter {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl Counter {
    fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    fn top(mut self, n: usize) -> Vec<(String, usize)> {
        // sort_by is stable, so equal counts stay in first-seen order
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries.truncate(n);
        self.entries
    }
}
