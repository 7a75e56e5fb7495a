//! Restriction coordinator
//!
//! Runs a single inbound group message through the pre-filter, the scanner,
//! the ledger and the policy, enforces the result on the platform, and fires
//! off the notifications. Platform failures are logged and folded into the
//! returned [`ModerationOutcome`]; none of them escape to the caller.

use crate::moderation::{
    ChatPlatform, ContentScanner, MessageHandle, MessageTemplates, NotificationLifecycleManager,
    PlatformResult, Punishment, PunishmentPolicy, Recipient, TemplateContext, TextFormat,
    ViolationLedger,
};
use crate::{ERROR_TARGET, MODERATION_TARGET};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// What kind of message arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Ordinary user message
    Regular,
    /// System message announcing a new member
    MemberJoined,
    /// System message announcing a departed member
    MemberLeft,
    /// Content forwarded from outside the chat
    Forwarded,
}

/// A group message as seen by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Chat (group) the message belongs to
    pub chat_id: u64,
    /// Channel the message was posted in
    pub channel_id: u64,
    pub message_id: u64,
    /// Author
    pub user_id: u64,
    /// Author display name
    pub user_name: String,
    pub text: String,
    pub kind: MessageKind,
}

impl InboundMessage {
    /// Handle of this message for deletion
    #[must_use]
    pub fn handle(&self) -> MessageHandle {
        MessageHandle::new(self.channel_id, self.message_id)
    }
}

/// Result of a detected violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// The forbidden term that matched
    pub term: String,
    /// Violations within the window, including this one
    pub violation_count: u32,
    pub punishment: Punishment,
    /// Whether the platform accepted the restriction
    pub enforced: bool,
}

/// What the coordinator did with a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// No text to inspect
    Ignored,
    /// Text inspected, nothing forbidden
    Passed,
    /// Join/leave system message removed
    SystemEventRemoved,
    /// Forwarded content removed and rejected
    ForwardRejected,
    /// Forbidden term found and punished
    Punished(Verdict),
}

/// Orchestrates detection, escalation, enforcement and notifications
#[derive(Clone)]
pub struct RestrictionCoordinator {
    scanner: Arc<ContentScanner>,
    ledger: ViolationLedger,
    policy: Arc<PunishmentPolicy>,
    templates: Arc<MessageTemplates>,
    notifications: NotificationLifecycleManager,
    platform: Arc<dyn ChatPlatform>,
}

impl RestrictionCoordinator {
    /// Create a coordinator acting through `platform`
    pub fn new(
        scanner: ContentScanner,
        ledger: ViolationLedger,
        policy: PunishmentPolicy,
        templates: MessageTemplates,
        platform: Arc<dyn ChatPlatform>,
    ) -> Self {
        Self {
            scanner: Arc::new(scanner),
            ledger,
            policy: Arc::new(policy),
            templates: Arc::new(templates),
            notifications: NotificationLifecycleManager::new(Arc::clone(&platform)),
            platform,
        }
    }

    /// Violation history
    #[must_use]
    pub fn ledger(&self) -> &ViolationLedger {
        &self.ledger
    }

    /// Pending group notifications
    #[must_use]
    pub fn notifications(&self) -> &NotificationLifecycleManager {
        &self.notifications
    }

    /// Handle one inbound group message
    pub async fn handle_candidate_message(&self, msg: &InboundMessage) -> ModerationOutcome {
        match msg.kind {
            MessageKind::MemberJoined | MessageKind::MemberLeft => {
                self.delete_logged(msg, "system event").await;
                return ModerationOutcome::SystemEventRemoved;
            }
            MessageKind::Forwarded => {
                self.delete_logged(msg, "forwarded message").await;
                let notice = self
                    .platform
                    .deliver_message(
                        Recipient::Channel(msg.channel_id),
                        &self.templates.forward_rejection,
                        TextFormat::Plain,
                    )
                    .await;
                contain(notice, msg.user_id, msg.chat_id);
                return ModerationOutcome::ForwardRejected;
            }
            MessageKind::Regular => {}
        }

        if msg.text.is_empty() {
            return ModerationOutcome::Ignored;
        }

        let Some(term) = self.scanner.scan(&msg.text) else {
            return ModerationOutcome::Passed;
        };
        let term = term.to_string();

        self.delete_logged(msg, "offending message").await;

        let violation_count = self.ledger.record_violation(msg.user_id);
        let punishment = self.policy.punishment_for(violation_count);

        info!(
            target: MODERATION_TARGET,
            user_id = msg.user_id,
            user_name = %msg.user_name,
            chat_id = msg.chat_id,
            term = %term,
            violation_count,
            punishment = %punishment,
            "Forbidden term detected"
        );

        let enforced = self.enforce(msg, punishment).await;
        if enforced {
            self.dispatch_notifications(msg, &term, punishment, violation_count);
        }

        ModerationOutcome::Punished(Verdict {
            term,
            violation_count,
            punishment,
            enforced,
        })
    }

    async fn enforce(&self, msg: &InboundMessage, punishment: Punishment) -> bool {
        let result = self
            .platform
            .restrict_or_ban(msg.chat_id, msg.user_id, punishment)
            .await;

        match result {
            Ok(()) => {
                info!(
                    target: MODERATION_TARGET,
                    user_id = msg.user_id,
                    chat_id = msg.chat_id,
                    punishment = %punishment,
                    "Restriction applied"
                );
                true
            }
            Err(e) => {
                error!(
                    target: ERROR_TARGET,
                    user_id = msg.user_id,
                    chat_id = msg.chat_id,
                    operation = e.operation(),
                    error = %e,
                    "Restriction failed, notifications suppressed"
                );
                false
            }
        }
    }

    /// Spawn the private warning and the group notification as independent tasks
    fn dispatch_notifications(
        &self,
        msg: &InboundMessage,
        term: &str,
        punishment: Punishment,
        violation_count: u32,
    ) {
        let ctx = TemplateContext {
            word: term,
            punishment,
            count: violation_count,
            user_name: &msg.user_name,
            user_id: msg.user_id,
            window: self.ledger.window(),
        };
        let warning = self.templates.render_private_warning(&ctx);
        let announcement = self.templates.render_group_notification(&ctx);

        let (user_id, chat_id, channel_id) = (msg.user_id, msg.chat_id, msg.channel_id);

        let platform = Arc::clone(&self.platform);
        tokio::spawn(async move {
            let sent = platform
                .deliver_message(Recipient::User(user_id), &warning, TextFormat::Plain)
                .await;
            if contain(sent, user_id, chat_id).is_some() {
                debug!(target: MODERATION_TARGET, user_id, "Private warning sent");
            }
        });

        let platform = Arc::clone(&self.platform);
        let notifications = self.notifications.clone();
        tokio::spawn(async move {
            let sent = platform
                .deliver_message(
                    Recipient::Channel(channel_id),
                    &announcement,
                    TextFormat::Markdown,
                )
                .await;
            if let Some(handle) = contain(sent, user_id, chat_id) {
                debug!(target: MODERATION_TARGET, user_id, notification = %handle, "Group notification sent");
                notifications.register_and_schedule_deletion(user_id, chat_id, handle, punishment);
            }
        });
    }

    async fn delete_logged(&self, msg: &InboundMessage, what: &str) {
        let result = self.platform.delete_message(msg.handle()).await;
        if contain(result, msg.user_id, msg.chat_id).is_some() {
            debug!(
                target: MODERATION_TARGET,
                user_id = msg.user_id,
                chat_id = msg.chat_id,
                "Deleted {what}"
            );
        }
    }
}

/// Log a failed platform call with its context and turn it into `None`
fn contain<T>(result: PlatformResult<T>, user_id: u64, chat_id: u64) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                target: ERROR_TARGET,
                user_id,
                chat_id,
                operation = e.operation(),
                error = %e,
                "Platform call failed"
            );
            None
        }
    }
}
