//! Violation count to punishment mapping

use crate::moderation::{PolicyError, Punishment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the punishment table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunishmentTier {
    /// Violation count at which this tier starts
    pub violations: u32,
    #[serde(flatten)]
    pub punishment: Punishment,
}

impl PunishmentTier {
    #[must_use]
    pub fn new(violations: u32, punishment: Punishment) -> Self {
        Self {
            violations,
            punishment,
        }
    }
}

/// Escalating punishment table with a ceiling at the highest tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunishmentPolicy {
    tiers: BTreeMap<u32, Punishment>,
}

impl PunishmentPolicy {
    /// Build a policy from tiers in any order
    ///
    /// # Errors
    /// Returns a `PolicyError` if the table is empty, has a tier for zero
    /// violations, a zero-length restriction, a repeated tier, or a tier less
    /// severe than a lower one.
    pub fn new(tiers: impl IntoIterator<Item = PunishmentTier>) -> Result<Self, PolicyError> {
        let mut table = BTreeMap::new();
        for tier in tiers {
            if tier.violations == 0 {
                return Err(PolicyError::ZeroThreshold);
            }
            if tier.punishment == Punishment::restrict(0) {
                return Err(PolicyError::ZeroDuration(tier.violations));
            }
            if table.insert(tier.violations, tier.punishment).is_some() {
                return Err(PolicyError::DuplicateThreshold(tier.violations));
            }
        }

        if table.is_empty() {
            return Err(PolicyError::EmptyTable);
        }

        let mut previous: Option<Punishment> = None;
        for (&violations, &punishment) in &table {
            if previous.is_some_and(|prev| punishment < prev) {
                return Err(PolicyError::Decreasing(violations));
            }
            previous = Some(punishment);
        }

        Ok(Self { tiers: table })
    }

    /// Punishment for the given violation count.
    ///
    /// Uses the greatest tier not above `count`. Counts past the last tier
    /// stay at the last tier, and counts below the first tier get the first.
    #[must_use]
    pub fn punishment_for(&self, count: u32) -> Punishment {
        self.tiers
            .range(..=count)
            .next_back()
            .or_else(|| self.tiers.iter().next())
            .map(|(_, punishment)| *punishment)
            .unwrap_or(Punishment::Ban)
    }

    /// Highest configured tier
    #[must_use]
    pub fn max_tier(&self) -> u32 {
        self.tiers.keys().next_back().copied().unwrap_or_default()
    }

    /// Configured tiers in ascending order
    pub fn tiers(&self) -> impl Iterator<Item = PunishmentTier> + '_ {
        self.tiers
            .iter()
            .map(|(&violations, &punishment)| PunishmentTier::new(violations, punishment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_policy() -> PunishmentPolicy {
        PunishmentPolicy::new([
            PunishmentTier::new(1, Punishment::restrict(300)),
            PunishmentTier::new(2, Punishment::restrict(3600)),
            PunishmentTier::new(3, Punishment::Ban),
        ])
        .unwrap()
    }

    #[test]
    fn test_exact_tiers() {
        let policy = scenario_policy();
        assert_eq!(policy.punishment_for(1), Punishment::restrict(300));
        assert_eq!(policy.punishment_for(2), Punishment::restrict(3600));
        assert_eq!(policy.punishment_for(3), Punishment::Ban);
        assert_eq!(policy.max_tier(), 3);
    }

    #[test]
    fn test_saturates_at_max_tier() {
        let policy = scenario_policy();
        let max = policy.punishment_for(policy.max_tier());
        for count in policy.max_tier()..policy.max_tier() + 50 {
            assert_eq!(policy.punishment_for(count), max);
        }
        assert_eq!(policy.punishment_for(u32::MAX), max);
    }

    #[test]
    fn test_monotonic() {
        let policy = PunishmentPolicy::new([
            PunishmentTier::new(2, Punishment::restrict(60)),
            PunishmentTier::new(5, Punishment::restrict(600)),
            PunishmentTier::new(9, Punishment::restrict(86400)),
        ])
        .unwrap();

        let mut previous = policy.punishment_for(0);
        for count in 1..20 {
            let current = policy.punishment_for(count);
            assert!(current >= previous, "count {count} de-escalated");
            previous = current;
        }

        // Gaps fall back to the tier below, the bottom to the first tier
        assert_eq!(policy.punishment_for(0), Punishment::restrict(60));
        assert_eq!(policy.punishment_for(4), Punishment::restrict(60));
        assert_eq!(policy.punishment_for(7), Punishment::restrict(600));
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert_eq!(
            PunishmentPolicy::new(Vec::new()).unwrap_err(),
            PolicyError::EmptyTable
        );
        assert_eq!(
            PunishmentPolicy::new([PunishmentTier::new(0, Punishment::restrict(60))]).unwrap_err(),
            PolicyError::ZeroThreshold
        );
        assert_eq!(
            PunishmentPolicy::new([PunishmentTier::new(1, Punishment::restrict(0))]).unwrap_err(),
            PolicyError::ZeroDuration(1)
        );
        assert_eq!(
            PunishmentPolicy::new([
                PunishmentTier::new(1, Punishment::restrict(60)),
                PunishmentTier::new(1, Punishment::restrict(120)),
            ])
            .unwrap_err(),
            PolicyError::DuplicateThreshold(1)
        );
        assert_eq!(
            PunishmentPolicy::new([
                PunishmentTier::new(1, Punishment::Ban),
                PunishmentTier::new(2, Punishment::restrict(120)),
            ])
            .unwrap_err(),
            PolicyError::Decreasing(2)
        );
    }

    #[test]
    fn test_unordered_input() {
        let policy = PunishmentPolicy::new([
            PunishmentTier::new(3, Punishment::Ban),
            PunishmentTier::new(1, Punishment::restrict(300)),
        ])
        .unwrap();
        let tiers: Vec<_> = policy.tiers().map(|t| t.violations).collect();
        assert_eq!(tiers, vec![1, 3]);
    }
}
