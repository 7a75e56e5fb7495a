//! Subscription gate
//!
//! Private conversations are only answered for users who are members of
//! every required channel. A failed membership lookup counts against the user.

use crate::moderation::{ChatPlatform, Recipient, TextFormat};
use crate::{ERROR_TARGET, MODERATION_TARGET};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{info, warn};

/// A channel or community the user must belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredChannel {
    pub id: u64,
    pub name: String,
    /// Invite link shown in the prompt
    #[serde(default)]
    pub url: Option<String>,
}

/// Result of a subscription check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionStatus {
    /// Required channels the user is not a member of
    pub missing: Vec<RequiredChannel>,
}

impl SubscriptionStatus {
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Gate in front of private conversations
#[derive(Clone)]
pub struct SubscriptionGate {
    required: Arc<Vec<RequiredChannel>>,
    platform: Arc<dyn ChatPlatform>,
}

impl SubscriptionGate {
    pub fn new(required: Vec<RequiredChannel>, platform: Arc<dyn ChatPlatform>) -> Self {
        Self {
            required: Arc::new(required),
            platform,
        }
    }

    /// Required channels, in configured order
    #[must_use]
    pub fn required(&self) -> &[RequiredChannel] {
        &self.required
    }

    /// Check the user's membership in every required channel
    pub async fn check(&self, user_id: u64) -> SubscriptionStatus {
        let mut missing = Vec::new();

        for channel in self.required.iter() {
            match self.platform.membership_status(channel.id, user_id).await {
                Ok(status) if status.is_present() => {}
                Ok(_) => {
                    missing.push(channel.clone());
                }
                Err(e) => {
                    warn!(
                        target: ERROR_TARGET,
                        user_id,
                        channel_id = channel.id,
                        operation = e.operation(),
                        error = %e,
                        "Membership lookup failed, treating as not subscribed"
                    );
                    missing.push(channel.clone());
                }
            }
        }

        SubscriptionStatus { missing }
    }

    /// Plain-text reply listing the channels still to join
    #[must_use]
    pub fn render_prompt(status: &SubscriptionStatus) -> String {
        let mut prompt = String::from("🔒 Join the following channels to use this bot:\n");
        for channel in &status.missing {
            match &channel.url {
                Some(url) => {
                    let _ = write!(prompt, "\n📢 {}: {url}", channel.name);
                }
                None => {
                    let _ = write!(prompt, "\n📢 {}", channel.name);
                }
            }
        }
        prompt
    }

    /// Answer a private message, prompting for subscriptions when needed.
    ///
    /// Returns whether the user passed the gate.
    pub async fn answer_private(&self, user_id: u64, user_name: &str, text: &str) -> bool {
        let status = self.check(user_id).await;
        let passed = status.is_subscribed();

        let reply = if passed {
            info!(target: MODERATION_TARGET, user_id, user_name, "Private message from subscribed user");
            format!("👍 Message received, {user_name}!\n\nYou wrote: {text}")
        } else {
            info!(
                target: MODERATION_TARGET,
                user_id,
                user_name,
                missing = status.missing.len(),
                "Private message from unsubscribed user"
            );
            Self::render_prompt(&status)
        };

        if let Err(e) = self
            .platform
            .deliver_message(Recipient::User(user_id), &reply, TextFormat::Plain)
            .await
        {
            warn!(
                target: ERROR_TARGET,
                user_id,
                operation = e.operation(),
                error = %e,
                "Failed to answer private message"
            );
        }

        passed
    }
}
