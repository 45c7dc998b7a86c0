//! PostgreSQL implementation of LockoutTracker
//!
//! Counters live on the users row. The increment is a single SQL statement
//! (`failed_login_attempts = failed_login_attempts + 1`) so concurrent
//! failures never lose counts to read-modify-write races in this process.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use blog_core::entities::LoginActivity;
use blog_core::traits::{LockoutTracker, RepoResult};

use super::error::{map_db_error, user_not_found, with_deadline};

/// PostgreSQL implementation of LockoutTracker
#[derive(Clone)]
pub struct PgLockoutTracker {
    pool: PgPool,
    op_timeout: Duration,
}

impl PgLockoutTracker {
    /// Create a new PgLockoutTracker bounded by `op_timeout` per operation
    pub fn new(pool: PgPool, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }
}

#[async_trait]
impl LockoutTracker for PgLockoutTracker {
    #[instrument(skip(self))]
    async fn record_failure(&self, username: &str) -> RepoResult<u32> {
        with_deadline(self.op_timeout, async {
            let count = sqlx::query_scalar::<_, i32>(
                r"
                UPDATE users
                SET failed_login_attempts = failed_login_attempts + 1,
                    last_failed_login_at = NOW(),
                    updated_at = NOW()
                WHERE username = $1 AND deleted_at IS NULL
                RETURNING failed_login_attempts
                ",
            )
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            match count {
                Some(n) => Ok(n.max(0) as u32),
                None => Err(user_not_found(username)),
            }
        })
        .await
    }

    #[instrument(skip(self))]
    async fn reset(&self, username: &str) -> RepoResult<()> {
        with_deadline(self.op_timeout, async {
            let result = sqlx::query(
                r"
                UPDATE users
                SET failed_login_attempts = 0,
                    last_failed_login_at = NULL,
                    updated_at = NOW()
                WHERE username = $1 AND deleted_at IS NULL
                ",
            )
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

            if result.rows_affected() == 0 {
                return Err(user_not_found(username));
            }
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn load(&self, username: &str) -> RepoResult<LoginActivity> {
        with_deadline(self.op_timeout, async {
            let model = sqlx::query_as::<_, crate::models::LoginActivityModel>(
                r"
                SELECT failed_login_attempts, last_failed_login_at
                FROM users
                WHERE username = $1 AND deleted_at IS NULL
                ",
            )
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            match model {
                Some(m) => Ok(m.into()),
                None => Err(user_not_found(username)),
            }
        })
        .await
    }
}
