//! Bounded in-memory event buffer.

use std::collections::VecDeque;

use crate::event::AuditEvent;

/// FIFO buffer of audit events holding at most `capacity` entries.
#[derive(Debug, Clone)]
pub struct EventStore {
    events: VecDeque<AuditEvent>,
    capacity: usize,
}

impl EventStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
        }
    }

    /// Build a store from previously persisted events, keeping the newest
    /// `capacity` of them.
    pub fn hydrate(capacity: usize, events: Vec<AuditEvent>) -> Self {
        let mut store = Self::new(capacity);
        for event in events {
            store.push(event);
        }
        store
    }

    /// Append an event, evicting from the front while over capacity.
    /// Returns how many events were evicted.
    pub fn push(&mut self, event: AuditEvent) -> usize {
        self.events.push_back(event);
        let mut evicted = 0;
        while self.events.len() > self.capacity {
            self.events.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// The most recent `n` events, oldest first.
    pub fn trailing(&self, n: usize) -> Vec<AuditEvent> {
        let skip = self.events.len().saturating_sub(n);
        self.events.iter().skip(skip).cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuditEvent> {
        self.events.iter()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
