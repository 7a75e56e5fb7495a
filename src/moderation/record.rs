//! Pending notification records
//!
//! A pending notification is the group message announcing a restriction. It
//! lives until the restriction runs out and is then deleted.

use crate::moderation::{MessageHandle, Punishment};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-user notification lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationState {
    /// No announcement is waiting for cleanup
    None,
    /// An announcement is live and scheduled for deletion
    Pending,
}

impl Default for NotificationState {
    fn default() -> Self {
        Self::None
    }
}

impl std::fmt::Display for NotificationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Pending => write!(f, "Pending"),
        }
    }
}

/// Group notification waiting to be removed when the restriction lapses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingNotification {
    /// Unique ID of this registration
    pub id: String,
    /// ID of the restricted user
    pub user_id: u64,
    /// ID of the chat the restriction applies to
    pub chat_id: u64,
    /// The announcement message
    pub message: MessageHandle,
    /// The punishment being announced
    pub punishment: Punishment,
    /// When the registration was made
    pub created_at: DateTime<Utc>,
    /// When the announcement should disappear
    pub expires_at: Option<DateTime<Utc>>,
}

impl PendingNotification {
    /// Create a new record starting now
    #[must_use]
    pub fn new(user_id: u64, chat_id: u64, message: MessageHandle, punishment: Punishment) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            chat_id,
            message,
            punishment,
            created_at: now,
            expires_at: Self::calculate_expiry(now, punishment),
        }
    }

    /// Expiry instant for a punishment starting at `start`
    #[must_use]
    pub fn calculate_expiry(start: DateTime<Utc>, punishment: Punishment) -> Option<DateTime<Utc>> {
        match punishment {
            Punishment::Restrict { seconds } => {
                let seconds = i64::try_from(seconds).ok()?;
                start.checked_add_signed(Duration::try_seconds(seconds)?)
            }
            Punishment::Ban => None,
        }
    }
}
