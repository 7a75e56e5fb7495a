//! Moderation engine
//!
//! Platform-independent core: forbidden-term detection, the sliding violation
//! window, escalating punishments, notification cleanup and the subscription
//! gate. Everything that talks to the chat service goes through
//! [`ChatPlatform`].

pub mod coordinator;
pub mod error;
pub mod ledger;
pub mod lifecycle;
pub mod platform;
pub mod policy;
pub mod punishment;
pub mod record;
pub mod scanner;
pub mod store;
pub mod subscription;
pub mod templates;

pub use coordinator::{InboundMessage, MessageKind, ModerationOutcome, RestrictionCoordinator, Verdict};
pub use error::{PlatformError, PlatformResult, PolicyError};
pub use ledger::ViolationLedger;
pub use lifecycle::NotificationLifecycleManager;
#[cfg(test)]
pub use platform::MockChatPlatform;
pub use platform::{ChatPlatform, MembershipStatus, MessageHandle, Recipient, TextFormat};
pub use policy::{PunishmentPolicy, PunishmentTier};
pub use punishment::{Punishment, format_duration};
pub use record::{NotificationState, PendingNotification};
pub use scanner::ContentScanner;
pub use store::NotificationStore;
pub use subscription::{RequiredChannel, SubscriptionGate, SubscriptionStatus};
pub use templates::{MessageTemplates, TemplateContext};
