use crate::moderation::{InboundMessage, MessageKind};
use crate::{Data, EVENT_TARGET, logging};
use poise::serenity_prelude::{
    self as serenity, Context, EventHandler, GuildId, Message, MessageReferenceKind, MessageType,
    Ready,
};
use tracing::{debug, info, warn};

pub struct Handler {
    pub data: Data,
}

impl Handler {
    #[must_use]
    pub fn new(data: Data) -> Self {
        Self { data }
    }
}

/// Classify a Discord message for the moderation engine.
///
/// `reference` is the kind and source guild of the message's reference, if
/// any. Only real forwards and content crossposted from another guild count
/// as forwarded; replies and thread starters point inside the guild.
#[must_use]
pub fn message_kind(
    kind: MessageType,
    guild_id: GuildId,
    reference: Option<(MessageReferenceKind, Option<GuildId>)>,
) -> MessageKind {
    match (kind, reference) {
        (MessageType::MemberJoin, _) => MessageKind::MemberJoined,
        (_, Some((MessageReferenceKind::Forward, _))) => MessageKind::Forwarded,
        (_, Some((_, Some(source)))) if source != guild_id => MessageKind::Forwarded,
        _ => MessageKind::Regular,
    }
}

/// Build the engine's view of a guild message
#[must_use]
pub fn inbound_message(guild_id: GuildId, msg: &Message) -> InboundMessage {
    InboundMessage {
        chat_id: guild_id.get(),
        channel_id: msg.channel_id.get(),
        message_id: msg.id.get(),
        user_id: msg.author.id.get(),
        user_name: msg
            .author
            .global_name
            .clone()
            .unwrap_or_else(|| msg.author.name.clone()),
        text: msg.content.clone(),
        kind: message_kind(
            msg.kind,
            guild_id,
            msg.message_reference.as_ref().map(|r| (r.kind, r.guild_id)),
        ),
    }
}

#[serenity::async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready, but the cache may not be fully populated yet.
    async fn ready(&self, ctx: Context, ready: Ready) {
        let user_name = ready.user.name.clone();
        let shard_id = ctx.shard_id;
        info!(target: EVENT_TARGET, "Connected as {user_name}, shard {shard_id}");
    }

    /// Called when the cache is fully populated.
    async fn cache_ready(&self, ctx: Context, guilds: Vec<GuildId>) {
        let guild_count_cache = ctx.cache.guild_count();
        let guild_count = guilds.len();
        if guild_count != guild_count_cache {
            warn!(
                target: EVENT_TARGET,
                "Cache guild count mismatch: {guild_count_cache} (cache) vs {guild_count} (actual)"
            );
        }
        info!(target: EVENT_TARGET, "Cache ready! The bot is in {guild_count} guild(s)");
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot || msg.author.id == ctx.cache.current_user().id {
            return;
        }

        let Some(guild_id) = msg.guild_id else {
            let user_name = msg
                .author
                .global_name
                .as_deref()
                .unwrap_or(&msg.author.name);
            self.data
                .gate
                .answer_private(msg.author.id.get(), user_name, &msg.content)
                .await;
            return;
        };

        let inbound = inbound_message(guild_id, &msg);
        debug!(
            target: EVENT_TARGET,
            guild_id = inbound.chat_id,
            channel_id = inbound.channel_id,
            user_id = inbound.user_id,
            kind = ?inbound.kind,
            "Message received"
        );

        let outcome = self.data.coordinator.handle_candidate_message(&inbound).await;
        logging::log_outcome(&inbound, &outcome);
    }
}
