use std::{ops::Deref, sync::Arc};

use crate::config::{ConfigError, ModerationConfig};
use crate::moderation::{
    ChatPlatform, ContentScanner, RestrictionCoordinator, SubscriptionGate, ViolationLedger,
};
use poise::serenity_prelude as serenity;
use serenity::prelude::TypeMapKey;

/// Centralized data structure for the bot
#[derive(Clone)]
pub struct Data(pub Arc<DataInner>);

// Implement TypeMapKey for Data to allow storing it in Serenity's data map
impl TypeMapKey for Data {
    type Value = Data;
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("config", &self.config)
            .field("tracked_users", &self.coordinator.ledger().tracked_users())
            .field(
                "pending_notifications",
                &self.coordinator.notifications().pending_count(),
            )
            .finish()
    }
}

impl Deref for Data {
    type Target = DataInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Data {
    /// Build the moderation state from configuration, acting through `platform`
    pub fn new(
        config: ModerationConfig,
        platform: Arc<dyn ChatPlatform>,
    ) -> Result<Self, ConfigError> {
        Ok(Self(Arc::new(DataInner::new(config, platform)?)))
    }
}

/// Main centralized data structure for the bot
pub struct DataInner {
    // Settings the bot was started with
    pub config: ModerationConfig,
    // Owns the violation ledger and pending notifications
    pub coordinator: RestrictionCoordinator,
    // Gate in front of private conversations
    pub gate: SubscriptionGate,
}

impl DataInner {
    pub fn new(
        config: ModerationConfig,
        platform: Arc<dyn ChatPlatform>,
    ) -> Result<Self, ConfigError> {
        let policy = config.build_policy()?;
        let coordinator = RestrictionCoordinator::new(
            ContentScanner::new(&config.forbidden_terms),
            ViolationLedger::new(config.violation_window()),
            policy,
            config.templates.clone(),
            Arc::clone(&platform),
        );
        let gate = SubscriptionGate::new(config.required_channels.clone(), platform);

        Ok(Self {
            config,
            coordinator,
            gate,
        })
    }
}
