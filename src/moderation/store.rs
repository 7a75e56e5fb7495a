//! Pending notification store
//!
//! Holds at most one pending notification per user.

use crate::moderation::{NotificationState, PendingNotification};
use dashmap::DashMap;
use std::sync::Arc;

/// Store for pending notifications keyed by user
#[derive(Clone, Debug)]
pub struct NotificationStore {
    /// user_id -> the user's current pending notification
    records: Arc<DashMap<u64, PendingNotification>>,
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationStore {
    /// Create a new notification store
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
        }
    }

    /// Store a record, returning the one it replaced
    pub fn register(&self, record: PendingNotification) -> Option<PendingNotification> {
        self.records.insert(record.user_id, record)
    }

    /// Get a copy of a user's pending notification
    #[must_use]
    pub fn get(&self, user_id: u64) -> Option<PendingNotification> {
        self.records.get(&user_id).map(|entry| entry.value().clone())
    }

    /// Remove a user's record only if it is still the registration `id`
    pub fn remove_if_current(&self, user_id: u64, id: &str) -> Option<PendingNotification> {
        self.records
            .remove_if(&user_id, |_, record| record.id == id)
            .map(|(_, record)| record)
    }

    /// Lifecycle state for a user
    #[must_use]
    pub fn state_of(&self, user_id: u64) -> NotificationState {
        if self.records.contains_key(&user_id) {
            NotificationState::Pending
        } else {
            NotificationState::None
        }
    }

    /// Number of pending notifications
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
