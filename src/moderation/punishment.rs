//! Punishment types
//!
//! A punishment is either a time-bounded restriction or a permanent ban.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

/// Punishment applied to a user for a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Punishment {
    /// Revoke posting permissions for the given number of seconds
    Restrict { seconds: u64 },
    /// Remove the user from the chat for good
    Ban,
}

impl Punishment {
    /// Create a new `Restrict` punishment
    #[must_use]
    pub fn restrict(seconds: u64) -> Self {
        Self::Restrict { seconds }
    }

    /// Check if this punishment never expires
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Ban)
    }

    /// Restriction length, `None` for a ban
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::Restrict { seconds } => Some(Duration::from_secs(*seconds)),
            Self::Ban => None,
        }
    }

    /// Severity used for ordering; a ban outranks every restriction
    fn severity(&self) -> u64 {
        match self {
            Self::Restrict { seconds } => *seconds,
            Self::Ban => u64::MAX,
        }
    }
}

impl PartialOrd for Punishment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Punishment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.severity().cmp(&other.severity())
    }
}

impl fmt::Display for Punishment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Restrict { seconds } => write!(f, "{}", format_duration(*seconds)),
            Self::Ban => write!(f, "permanently"),
        }
    }
}

/// Human-readable duration, largest whole unit only
#[must_use]
pub fn format_duration(total_secs: u64) -> String {
    fn plural(n: u64, unit: &str) -> String {
        format!("{n} {unit}{}", if n == 1 { "" } else { "s" })
    }

    if total_secs < 60 {
        plural(total_secs, "second")
    } else if total_secs < 3600 {
        plural(total_secs / 60, "minute")
    } else if total_secs < 86400 {
        plural(total_secs / 3600, "hour")
    } else {
        plural(total_secs / 86400, "day")
    }
}
