//! Login attempt tracking and lockout policy
//!
//! The lockout decision is recomputed from the two stored fields on every
//! check; there is no stored "locked" boolean that could drift out of sync
//! with the counter.

use chrono::{DateTime, Duration, Utc};

/// Failed-attempt state for one username
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoginActivity {
    /// Consecutive failed attempts since the last successful login
    pub failed_attempts: u32,
    /// Timestamp of the most recent failure, if any
    pub last_failed_at: Option<DateTime<Utc>>,
}

impl LoginActivity {
    /// Create a new activity record
    pub fn new(failed_attempts: u32, last_failed_at: Option<DateTime<Utc>>) -> Self {
        Self {
            failed_attempts,
            last_failed_at,
        }
    }

    /// Whether the account is locked out under `policy` at instant `now`
    ///
    /// Locked iff the attempt count reached the threshold AND the most recent
    /// failure is still inside the trailing window. Attempts older than the
    /// window never lock, regardless of count.
    pub fn is_locked_out(&self, policy: &LockoutPolicy, now: DateTime<Utc>) -> bool {
        if self.failed_attempts < policy.threshold {
            return false;
        }
        match self.last_failed_at {
            Some(last) => now.signed_duration_since(last) < policy.window,
            None => false,
        }
    }

    /// Seconds until the lockout window expires, 0 when not locked
    pub fn retry_after_secs(&self, policy: &LockoutPolicy, now: DateTime<Utc>) -> i64 {
        if !self.is_locked_out(policy, now) {
            return 0;
        }
        match self.last_failed_at {
            Some(last) => (last + policy.window - now).num_seconds().max(0),
            None => 0,
        }
    }
}

/// Lockout policy: how many failures within what trailing window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub threshold: u32,
    pub window: Duration,
}

impl LockoutPolicy {
    /// Create a new policy
    pub fn new(threshold: u32, window: Duration) -> Self {
        Self { threshold, window }
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            threshold: 3,
            window: Duration::minutes(15),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> LockoutPolicy {
        LockoutPolicy::new(3, Duration::minutes(15))
    }

    #[test]
    fn test_below_threshold_never_locks() {
        let now = Utc::now();
        let activity = LoginActivity::new(2, Some(now));
        assert!(!activity.is_locked_out(&policy(), now));
    }

    #[test]
    fn test_threshold_inside_window_locks() {
        let now = Utc::now();
        let activity = LoginActivity::new(3, Some(now - Duration::minutes(2)));
        assert!(activity.is_locked_out(&policy(), now));
    }

    #[test]
    fn test_stale_failures_do_not_lock() {
        let now = Utc::now();
        let activity = LoginActivity::new(10, Some(now - Duration::minutes(16)));
        assert!(!activity.is_locked_out(&policy(), now));
    }

    #[test]
    fn test_no_failure_timestamp_never_locks() {
        let now = Utc::now();
        let activity = LoginActivity::new(5, None);
        assert!(!activity.is_locked_out(&policy(), now));
    }

    #[test]
    fn test_reset_clears_lockout() {
        let now = Utc::now();
        let mut activity = LoginActivity::new(3, Some(now));
        assert!(activity.is_locked_out(&policy(), now));

        activity.failed_attempts = 0;
        assert!(!activity.is_locked_out(&policy(), now));
    }

    #[test]
    fn test_retry_after() {
        let now = Utc::now();
        let activity = LoginActivity::new(3, Some(now - Duration::minutes(5)));
        let secs = activity.retry_after_secs(&policy(), now);
        assert!(secs > 0 && secs <= 600);

        let unlocked = LoginActivity::new(0, None);
        assert_eq!(unlocked.retry_after_secs(&policy(), now), 0);
    }
}
