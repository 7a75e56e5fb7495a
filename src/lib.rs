pub mod commands;
pub mod config;
pub mod data;
pub mod discord;
pub mod handlers;
pub mod logging;
pub mod moderation;

pub const BOT_NAME: &str = "chat_warden";
pub const COMMAND_TARGET: &str = "chat_warden::command";
pub const ERROR_TARGET: &str = "chat_warden::error";
pub const EVENT_TARGET: &str = "chat_warden::handlers";
pub const MODERATION_TARGET: &str = "chat_warden::moderation";
pub const CONSOLE_TARGET: &str = "chat_warden";

pub use config::{ConfigError, ModerationConfig};
pub use data::{Data, DataInner};
pub use discord::DiscordPlatform;
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
