//! Error types for the moderation engine
//!
//! Every failure here originates either at the chat platform boundary or in
//! a malformed punishment table. Platform errors never leave the coordinator;
//! policy errors only surface while loading configuration.

use thiserror::Error;

/// Errors reported by the chat platform
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Message could not be delivered (unreachable target, network fault)
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Restriction or ban was rejected by the platform
    #[error("Enforcement failed: {0}")]
    Enforcement(String),

    /// Message could not be deleted (already gone, insufficient privilege)
    #[error("Deletion failed: {0}")]
    Deletion(String),

    /// Membership of a user could not be determined
    #[error("Membership lookup failed: {0}")]
    MembershipLookup(String),
}

impl PlatformError {
    /// Short operation name used as a structured log field
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Delivery(_) => "deliver_message",
            Self::Enforcement(_) => "restrict_or_ban",
            Self::Deletion(_) => "delete_message",
            Self::MembershipLookup(_) => "membership_status",
        }
    }
}

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Errors in a punishment tier table
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Punishment table is empty")]
    EmptyTable,

    #[error("Punishment tiers start at one violation, got a tier for 0")]
    ZeroThreshold,

    #[error("Restriction for tier {0} has a zero duration")]
    ZeroDuration(u32),

    #[error("Tier {0} is configured more than once")]
    DuplicateThreshold(u32),

    #[error("Tier {0} is less severe than the tier before it")]
    Decreasing(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = PlatformError::Enforcement("missing permissions".to_string());
        assert_eq!(error.to_string(), "Enforcement failed: missing permissions");
        assert_eq!(error.operation(), "restrict_or_ban");

        let error = PlatformError::Deletion("unknown message".to_string());
        assert_eq!(error.operation(), "delete_message");

        let error = PolicyError::Decreasing(3);
        assert_eq!(
            error.to_string(),
            "Tier 3 is less severe than the tier before it"
        );
    }
}
