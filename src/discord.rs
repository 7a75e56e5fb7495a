//! Discord implementation of the chat platform
//!
//! Chats are guilds. A restriction is a member timeout, a ban is a guild ban
//! and private messages go through the user's DM channel.

use crate::moderation::{
    ChatPlatform, MembershipStatus, MessageHandle, PlatformError, PlatformResult, Punishment,
    Recipient, TextFormat,
};
use chrono::Utc;
use poise::serenity_prelude::{
    self as serenity, ChannelId, CreateAllowedMentions, CreateMessage, GuildId, Http, HttpError,
    MessageId, UserId, builder::EditMember,
};
use std::sync::Arc;

/// Longest timeout Discord accepts
pub const MAX_TIMEOUT_SECS: u64 = 28 * 24 * 60 * 60;

/// [`ChatPlatform`] over serenity's HTTP client
#[derive(Clone)]
pub struct DiscordPlatform {
    http: Arc<Http>,
}

impl DiscordPlatform {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Timeout length actually requested from Discord
    #[must_use]
    pub fn clamp_timeout(seconds: u64) -> u64 {
        seconds.min(MAX_TIMEOUT_SECS)
    }
}

fn is_not_found(err: &serenity::Error) -> bool {
    matches!(
        err,
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 404
    )
}

#[async_trait::async_trait]
impl ChatPlatform for DiscordPlatform {
    async fn deliver_message(
        &self,
        recipient: Recipient,
        text: &str,
        format: TextFormat,
    ) -> PlatformResult<MessageHandle> {
        let http: &Http = &self.http;

        let channel_id = match recipient {
            Recipient::Channel(id) => ChannelId::new(id),
            Recipient::User(id) => {
                UserId::new(id)
                    .create_dm_channel(http)
                    .await
                    .map_err(|e| PlatformError::Delivery(format!("Failed to open DM with {id}: {e}")))?
                    .id
            }
        };

        // Plain text must not ping anyone
        let builder = match format {
            TextFormat::Plain => CreateMessage::new()
                .content(text)
                .allowed_mentions(CreateAllowedMentions::new()),
            TextFormat::Markdown => CreateMessage::new().content(text),
        };

        let sent = channel_id
            .send_message(http, builder)
            .await
            .map_err(|e| PlatformError::Delivery(format!("Channel {channel_id}: {e}")))?;

        Ok(MessageHandle::new(sent.channel_id.get(), sent.id.get()))
    }

    async fn restrict_or_ban(
        &self,
        chat_id: u64,
        user_id: u64,
        punishment: Punishment,
    ) -> PlatformResult<()> {
        let http: &Http = &self.http;
        let guild_id = GuildId::new(chat_id);
        let user = UserId::new(user_id);

        match punishment {
            Punishment::Restrict { seconds } => {
                let seconds = i64::try_from(Self::clamp_timeout(seconds)).unwrap_or(i64::MAX);
                let until = chrono::Duration::try_seconds(seconds)
                    .and_then(|d| Utc::now().checked_add_signed(d))
                    .ok_or_else(|| {
                        PlatformError::Enforcement(format!("Timeout of {seconds}s out of range"))
                    })?;

                guild_id
                    .edit_member(
                        http,
                        user,
                        EditMember::new().disable_communication_until_datetime(until.into()),
                    )
                    .await
                    .map_err(|e| {
                        PlatformError::Enforcement(format!(
                            "Timeout of {user} in guild {guild_id}: {e}"
                        ))
                    })?;
            }
            Punishment::Ban => {
                guild_id
                    .ban_with_reason(http, user, 0, "Repeated use of forbidden words")
                    .await
                    .map_err(|e| {
                        PlatformError::Enforcement(format!("Ban of {user} in guild {guild_id}: {e}"))
                    })?;
            }
        }

        Ok(())
    }

    async fn delete_message(&self, message: MessageHandle) -> PlatformResult<()> {
        ChannelId::new(message.channel_id)
            .delete_message(&*self.http, MessageId::new(message.message_id))
            .await
            .map_err(|e| PlatformError::Deletion(format!("Message {message}: {e}")))
    }

    async fn membership_status(
        &self,
        channel_id: u64,
        user_id: u64,
    ) -> PlatformResult<MembershipStatus> {
        let http: &Http = &self.http;
        let guild_id = GuildId::new(channel_id);

        let guild = guild_id.to_partial_guild(http).await.map_err(|e| {
            PlatformError::MembershipLookup(format!("Failed to get guild {guild_id}: {e}"))
        })?;

        if guild.owner_id.get() == user_id {
            return Ok(MembershipStatus::Creator);
        }

        match guild.member(http, UserId::new(user_id)).await {
            Ok(member) => {
                #[allow(deprecated)]
                let permissions = guild.member_permissions(&member);
                if permissions.administrator() {
                    Ok(MembershipStatus::Administrator)
                } else {
                    Ok(MembershipStatus::Member)
                }
            }
            Err(e) if is_not_found(&e) => Ok(MembershipStatus::Left),
            Err(e) => Err(PlatformError::MembershipLookup(format!(
                "Failed to get member {user_id} in guild {guild_id}: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_clamped_to_discord_maximum() {
        assert_eq!(DiscordPlatform::clamp_timeout(300), 300);
        assert_eq!(DiscordPlatform::clamp_timeout(MAX_TIMEOUT_SECS), MAX_TIMEOUT_SECS);
        assert_eq!(DiscordPlatform::clamp_timeout(u64::MAX), MAX_TIMEOUT_SECS);
    }

    #[test]
    fn test_other_errors_are_not_not_found() {
        let err = serenity::Error::Other("boom");
        assert!(!is_not_found(&err));
    }
}
