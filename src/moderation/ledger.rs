//! Violation ledger
//!
//! Keeps a per-user list of violation timestamps and answers "how many times
//! has this user violated policy within the window". Stale timestamps are
//! purged lazily whenever a user's entry is read or written, so a count
//! decays on its own without any background job.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;

/// Rolling per-user violation history
#[derive(Debug, Clone)]
pub struct ViolationLedger {
    /// user_id -> violation timestamps in chronological order
    records: Arc<DashMap<u64, Vec<DateTime<Utc>>>>,
    /// Violations older than this no longer count
    window: Duration,
}

impl ViolationLedger {
    /// Create an empty ledger with the given window
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            window,
        }
    }

    /// Record a violation happening now and return the user's count
    pub fn record_violation(&self, user_id: u64) -> u32 {
        self.record_violation_at(user_id, Utc::now())
    }

    /// Record a violation at `now` and return the user's count
    pub fn record_violation_at(&self, user_id: u64, now: DateTime<Utc>) -> u32 {
        // The entry guard holds the shard lock, so append and purge are atomic
        // for this user.
        let mut timestamps = self.records.entry(user_id).or_default();
        timestamps.push(now);
        Self::purge(&mut timestamps, now, self.window)
    }

    /// Current count for a user
    #[must_use]
    pub fn current_count(&self, user_id: u64) -> u32 {
        self.current_count_at(user_id, Utc::now())
    }

    /// Count for a user as seen at `now`
    #[must_use]
    pub fn current_count_at(&self, user_id: u64, now: DateTime<Utc>) -> u32 {
        match self.records.get_mut(&user_id) {
            Some(mut timestamps) => Self::purge(&mut timestamps, now, self.window),
            None => 0,
        }
    }

    /// The configured violation window
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of users that ever had a violation recorded
    #[must_use]
    pub fn tracked_users(&self) -> usize {
        self.records.len()
    }

    fn purge(timestamps: &mut Vec<DateTime<Utc>>, now: DateTime<Utc>, window: Duration) -> u32 {
        timestamps.retain(|t| now - *t < window);
        u32::try_from(timestamps.len()).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const DAY: i64 = 86_400;

    #[test]
    fn test_counts_within_window() {
        let ledger = ViolationLedger::new(Duration::seconds(DAY));
        let start = Utc::now();

        assert_eq!(ledger.record_violation_at(1, start), 1);
        assert_eq!(
            ledger.record_violation_at(1, start + Duration::minutes(10)),
            2
        );
        assert_eq!(
            ledger.record_violation_at(1, start + Duration::minutes(20)),
            3
        );

        // Other users are unaffected
        assert_eq!(ledger.current_count_at(2, start), 0);
    }

    #[test]
    fn test_spaced_violations_count_once() {
        let window = Duration::seconds(60);
        let ledger = ViolationLedger::new(window);
        let start = Utc::now();

        let mut last = 0;
        for i in 0..5 {
            let at = start + (window + Duration::seconds(1)) * i;
            last = ledger.record_violation_at(7, at);
        }
        assert_eq!(last, 1);
        assert_eq!(
            ledger.current_count_at(7, start + (window + Duration::seconds(1)) * 4),
            1
        );
    }

    #[test]
    fn test_count_decays() {
        let ledger = ViolationLedger::new(Duration::seconds(DAY));
        let start = Utc::now();
        ledger.record_violation_at(3, start);
        ledger.record_violation_at(3, start + Duration::hours(12));

        assert_eq!(ledger.current_count_at(3, start + Duration::hours(23)), 2);
        assert_eq!(ledger.current_count_at(3, start + Duration::hours(25)), 1);
        assert_eq!(ledger.current_count_at(3, start + Duration::hours(37)), 0);

        // Entry survives even when empty
        assert_eq!(ledger.tracked_users(), 1);
    }

    #[test]
    fn test_exact_window_boundary_is_stale() {
        let ledger = ViolationLedger::new(Duration::seconds(100));
        let start = Utc::now();
        ledger.record_violation_at(4, start);
        assert_eq!(ledger.current_count_at(4, start + Duration::seconds(99)), 1);
        assert_eq!(ledger.current_count_at(4, start + Duration::seconds(100)), 0);
    }

    #[test]
    fn test_current_count_is_idempotent() {
        let ledger = ViolationLedger::new(Duration::seconds(DAY));
        let now = Utc::now();
        ledger.record_violation_at(5, now);
        ledger.record_violation_at(5, now);

        assert_eq!(ledger.current_count_at(5, now), 2);
        assert_eq!(ledger.current_count_at(5, now), 2);
        assert_eq!(ledger.current_count(5), 2);

        // Recording is not
        assert_eq!(ledger.record_violation_at(5, now), 3);
    }

    #[test]
    fn test_unknown_user_not_tracked() {
        let ledger = ViolationLedger::new(Duration::seconds(DAY));
        assert_eq!(ledger.current_count(42), 0);
        assert_eq!(ledger.tracked_users(), 0);
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let ledger = ViolationLedger::new(Duration::seconds(DAY));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = ledger.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        ledger.record_violation(9);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(ledger.current_count(9), 400);
    }
}
