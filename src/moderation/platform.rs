//! Chat platform boundary
//!
//! The moderation engine never talks to a concrete chat service directly.
//! Everything it needs from one goes through [`ChatPlatform`].

use crate::moderation::{PlatformResult, Punishment};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a message should be delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipient {
    /// A channel inside a group chat
    Channel(u64),
    /// A private conversation with a user
    User(u64),
}

/// Text formatting hint for delivered messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    Markdown,
}

/// Identity of a delivered message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle {
    pub channel_id: u64,
    pub message_id: u64,
}

impl MessageHandle {
    #[must_use]
    pub fn new(channel_id: u64, message_id: u64) -> Self {
        Self {
            channel_id,
            message_id,
        }
    }
}

impl fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.channel_id, self.message_id)
    }
}

/// Membership of a user in a channel or community
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipStatus {
    Member,
    Left,
    Kicked,
    Administrator,
    Creator,
}

impl MembershipStatus {
    /// Whether this status means the user is currently inside
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Member | Self::Administrator | Self::Creator)
    }
}

/// Capabilities the engine consumes from the chat platform
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Send a message and return its handle
    async fn deliver_message(
        &self,
        recipient: Recipient,
        text: &str,
        format: TextFormat,
    ) -> PlatformResult<MessageHandle>;

    /// Restrict a user for the punishment's duration, or ban them
    async fn restrict_or_ban(
        &self,
        chat_id: u64,
        user_id: u64,
        punishment: Punishment,
    ) -> PlatformResult<()>;

    /// Delete a message
    async fn delete_message(&self, message: MessageHandle) -> PlatformResult<()>;

    /// Look up a user's membership of a channel or community
    async fn membership_status(
        &self,
        channel_id: u64,
        user_id: u64,
    ) -> PlatformResult<MembershipStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_presence() {
        assert!(MembershipStatus::Member.is_present());
        assert!(MembershipStatus::Administrator.is_present());
        assert!(MembershipStatus::Creator.is_present());
        assert!(!MembershipStatus::Left.is_present());
        assert!(!MembershipStatus::Kicked.is_present());
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(MessageHandle::new(10, 20).to_string(), "10/20");
    }
}
