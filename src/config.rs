//! Bot configuration
//!
//! Loaded once at startup from a YAML file. A missing file means defaults;
//! a malformed one stops the bot.

use crate::moderation::{
    MessageTemplates, PolicyError, Punishment, PunishmentPolicy, PunishmentTier, RequiredChannel,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Environment variable holding the config path
pub const CONFIG_ENV: &str = "WARDEN_CONFIG";
/// Config path used when the variable is unset
pub const DEFAULT_CONFIG_PATH: &str = "config/moderation.yaml";

/// Errors raised while loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid punishment table: {0}")]
    Policy(#[from] PolicyError),
}

/// Moderation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Terms that trigger a violation, matched case-insensitively
    pub forbidden_terms: Vec<String>,
    /// Length of the sliding violation window
    pub violation_window_secs: u64,
    /// Escalation table
    pub punishments: Vec<PunishmentTier>,
    pub templates: MessageTemplates,
    /// Channels a user must belong to before the bot answers in private
    pub required_channels: Vec<RequiredChannel>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            forbidden_terms: Vec::new(),
            violation_window_secs: 86_400,
            punishments: vec![
                PunishmentTier::new(1, Punishment::restrict(300)),
                PunishmentTier::new(2, Punishment::restrict(3600)),
                PunishmentTier::new(3, Punishment::restrict(86_400)),
                PunishmentTier::new(4, Punishment::Ban),
            ],
            templates: MessageTemplates::default(),
            required_channels: Vec::new(),
        }
    }
}

impl ModerationConfig {
    /// Load from `WARDEN_CONFIG`, or the default path
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(path)
    }

    /// Load from an explicit path; a missing file yields the defaults
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config = Self::from_yaml(&contents).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.build_policy()?;

        info!(
            path = %path.display(),
            terms = config.forbidden_terms.len(),
            tiers = config.punishments.len(),
            required_channels = config.required_channels.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parse YAML text
    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    /// Validated escalation policy
    pub fn build_policy(&self) -> Result<PunishmentPolicy, PolicyError> {
        PunishmentPolicy::new(self.punishments.iter().copied())
    }

    /// Violation window as a chrono duration
    #[must_use]
    pub fn violation_window(&self) -> chrono::Duration {
        let secs = i64::try_from(self.violation_window_secs).unwrap_or(i64::MAX);
        chrono::Duration::try_seconds(secs).unwrap_or(chrono::Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ModerationConfig::default();
        let policy = config.build_policy().unwrap();
        assert_eq!(policy.punishment_for(1), Punishment::restrict(300));
        assert_eq!(policy.punishment_for(3), Punishment::restrict(86_400));
        assert_eq!(policy.punishment_for(4), Punishment::Ban);
        assert_eq!(config.violation_window().num_seconds(), 86_400);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
forbidden_terms: [spam, "Scam Link"]
violation_window_secs: 3600
punishments:
  - violations: 1
    action: restrict
    seconds: 60
  - violations: 2
    action: ban
templates:
  forward_rejection: "No forwards"
required_channels:
  - id: 42
    name: Announcements
    url: https://discord.gg/example
"#;
        let config = ModerationConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.forbidden_terms, vec!["spam", "Scam Link"]);
        assert_eq!(config.violation_window_secs, 3600);
        assert_eq!(
            config.punishments,
            vec![
                PunishmentTier::new(1, Punishment::restrict(60)),
                PunishmentTier::new(2, Punishment::Ban),
            ]
        );
        assert_eq!(config.templates.forward_rejection, "No forwards");
        assert_eq!(
            config.templates.private_warning,
            MessageTemplates::default().private_warning
        );
        assert_eq!(config.required_channels[0].id, 42);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = ModerationConfig::from_yaml("forbidden_terms: [spam]\n").unwrap();
        assert_eq!(config.violation_window_secs, 86_400);
        assert_eq!(config.punishments, ModerationConfig::default().punishments);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = ModerationConfig::load_from("does/not/exist.yaml").unwrap();
        assert_eq!(config, ModerationConfig::default());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("warden-bad-{}.yaml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "punishments: [1, 2").unwrap();
        let result = ModerationConfig::load_from(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn test_bad_policy_is_an_error() {
        let path = std::env::temp_dir().join(format!("warden-policy-{}.yaml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "punishments: []\n").unwrap();
        let result = ModerationConfig::load_from(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            result,
            Err(ConfigError::Policy(PolicyError::EmptyTable))
        ));
    }
}
