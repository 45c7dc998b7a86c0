//! Auth guard service
//!
//! Failed-login tracking and the lockout decision. The counters are durable
//! and incremented atomically by the tracker; the decision itself is a pure
//! function of the counters and the configured policy, recomputed on every
//! check and never stored.

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::dto::LockoutStatus;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Auth guard service
pub struct AuthGuardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthGuardService<'a> {
    /// Create a new AuthGuardService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Whether a login attempt for `username` may proceed right now.
    ///
    /// Returns `ServiceError::Locked` when the account is inside the lockout
    /// window, so callers can map it straight to a 429.
    #[instrument(skip(self))]
    pub async fn check_login_allowed(&self, username: &str) -> ServiceResult<LockoutStatus> {
        let activity = self.ctx.lockout_tracker().load(username).await?;
        let policy = self.ctx.lockout_policy();
        let now = Utc::now();

        if activity.is_locked_out(policy, now) {
            let retry_after_secs = activity.retry_after_secs(policy, now);
            warn!(
                username = %username,
                failed_attempts = activity.failed_attempts,
                retry_after_secs,
                "Login attempt on locked account"
            );
            return Err(ServiceError::Locked { retry_after_secs });
        }

        Ok(LockoutStatus {
            locked: false,
            failed_attempts: activity.failed_attempts,
            retry_after_secs: 0,
        })
    }

    /// Record a failed login attempt; returns the updated status
    #[instrument(skip(self))]
    pub async fn record_failed_login(&self, username: &str) -> ServiceResult<LockoutStatus> {
        let count = self.ctx.lockout_tracker().record_failure(username).await?;
        let policy = self.ctx.lockout_policy();

        if count >= policy.threshold {
            warn!(username = %username, failed_attempts = count, "Account entered lockout");
        } else {
            info!(username = %username, failed_attempts = count, "Failed login recorded");
        }

        let activity = self.ctx.lockout_tracker().load(username).await?;
        let now = Utc::now();
        Ok(LockoutStatus {
            locked: activity.is_locked_out(policy, now),
            failed_attempts: activity.failed_attempts,
            retry_after_secs: activity.retry_after_secs(policy, now),
        })
    }

    /// Record a successful login, resetting the failure counters
    #[instrument(skip(self))]
    pub async fn record_successful_login(&self, username: &str) -> ServiceResult<()> {
        self.ctx.lockout_tracker().reset(username).await?;
        info!(username = %username, "Login succeeded, failure counters reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::entities::{LockoutPolicy, User};
    use blog_core::traits::UserRepository;
    use blog_core::value_objects::UserId;

    async fn ctx_with_user(username: &str) -> ServiceContext {
        let ctx = ServiceContext::in_memory(LockoutPolicy::default());
        let user = User::new(
            UserId::new(1),
            username.to_string(),
            format!("{username}@example.com"),
        );
        ctx.user_repo().create(&user, "hash").await.unwrap();
        ctx
    }

    #[tokio::test]
    async fn test_lockout_after_threshold() {
        let ctx = ctx_with_user("alice").await;
        let guard = AuthGuardService::new(&ctx);

        // Below threshold: still allowed
        for _ in 0..2 {
            let status = guard.record_failed_login("alice").await.unwrap();
            assert!(!status.locked);
        }
        assert!(guard.check_login_allowed("alice").await.is_ok());

        // Third failure trips the lock
        let status = guard.record_failed_login("alice").await.unwrap();
        assert!(status.locked);
        assert_eq!(status.failed_attempts, 3);
        assert!(status.retry_after_secs > 0);

        let err = guard.check_login_allowed("alice").await.unwrap_err();
        assert!(matches!(err, ServiceError::Locked { .. }));
        assert_eq!(err.status_code(), 429);
    }

    #[tokio::test]
    async fn test_success_resets_counters() {
        let ctx = ctx_with_user("alice").await;
        let guard = AuthGuardService::new(&ctx);

        for _ in 0..3 {
            guard.record_failed_login("alice").await.unwrap();
        }
        assert!(guard.check_login_allowed("alice").await.is_err());

        guard.record_successful_login("alice").await.unwrap();
        let status = guard.check_login_allowed("alice").await.unwrap();
        assert!(!status.locked);
        assert_eq!(status.failed_attempts, 0);

        // A failure after the reset counts from 1, not from the old value
        let status = guard.record_failed_login("alice").await.unwrap();
        assert!(!status.locked);
        assert_eq!(status.failed_attempts, 1);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let ctx = ServiceContext::in_memory(LockoutPolicy::default());
        let guard = AuthGuardService::new(&ctx);

        let err = guard.record_failed_login("ghost").await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
