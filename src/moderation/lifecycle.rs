//! Notification lifecycle
//!
//! Every announced restriction gets a deferred task that deletes the
//! announcement once the restriction lapses. The task is never cancelled.
//! When a newer violation replaces the user's record first, the old task
//! finds nothing of its own left to delete and does nothing.

use crate::moderation::{
    ChatPlatform, MessageHandle, NotificationState, NotificationStore, PendingNotification,
    Punishment,
};
use crate::{ERROR_TARGET, MODERATION_TARGET};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Tracks one pending group notification per restricted user
#[derive(Clone)]
pub struct NotificationLifecycleManager {
    store: NotificationStore,
    platform: Arc<dyn ChatPlatform>,
}

impl NotificationLifecycleManager {
    /// Create a new manager deleting through `platform`
    pub fn new(platform: Arc<dyn ChatPlatform>) -> Self {
        Self {
            store: NotificationStore::new(),
            platform,
        }
    }

    /// Register a group notification and schedule its deletion.
    ///
    /// Bans have no unblock moment, so nothing is stored or scheduled for
    /// them. Returns the handle of the deferred deletion task, if one was
    /// spawned.
    pub fn register_and_schedule_deletion(
        &self,
        user_id: u64,
        chat_id: u64,
        notification: MessageHandle,
        punishment: Punishment,
    ) -> Option<JoinHandle<()>> {
        let Some(delay) = punishment.duration() else {
            debug!(
                target: MODERATION_TARGET,
                user_id,
                chat_id,
                notification = %notification,
                "Ban notification is permanent, no deletion scheduled"
            );
            return None;
        };

        let record = PendingNotification::new(user_id, chat_id, notification, punishment);
        let record_id = record.id.clone();

        if let Some(previous) = self.store.register(record) {
            info!(
                target: MODERATION_TARGET,
                user_id,
                superseded = %previous.message,
                "Pending notification superseded by a newer violation"
            );
        }

        info!(
            target: MODERATION_TARGET,
            user_id,
            chat_id,
            notification = %notification,
            delay_secs = delay.as_secs(),
            "Scheduled group notification deletion"
        );

        let store = self.store.clone();
        let platform = Arc::clone(&self.platform);

        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            Self::delete_if_current(&store, platform.as_ref(), user_id, &record_id).await;
        }))
    }

    /// Deferred deletion body; a no-op if the record was superseded or removed
    async fn delete_if_current(
        store: &NotificationStore,
        platform: &dyn ChatPlatform,
        user_id: u64,
        record_id: &str,
    ) {
        let Some(record) = store.remove_if_current(user_id, record_id) else {
            debug!(
                target: MODERATION_TARGET,
                user_id,
                record_id,
                "Notification no longer pending, skipping deletion"
            );
            return;
        };

        match platform.delete_message(record.message).await {
            Ok(()) => info!(
                target: MODERATION_TARGET,
                user_id,
                chat_id = record.chat_id,
                notification = %record.message,
                "Deleted group notification after restriction ended"
            ),
            Err(e) => error!(
                target: ERROR_TARGET,
                user_id,
                chat_id = record.chat_id,
                operation = e.operation(),
                error = %e,
                "Failed to delete group notification"
            ),
        }
    }

    /// Current pending notification for a user
    #[must_use]
    pub fn pending_for(&self, user_id: u64) -> Option<PendingNotification> {
        self.store.get(user_id)
    }

    /// Lifecycle state for a user
    #[must_use]
    pub fn state_of(&self, user_id: u64) -> NotificationState {
        self.store.state_of(user_id)
    }

    /// Number of notifications waiting for deletion
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.store.len()
    }
}
