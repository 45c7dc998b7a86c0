//! PostgreSQL implementation of ReactionStore
//!
//! Every mutation is one transaction: lock the post row (`FOR UPDATE`, which
//! doubles as the existence check and the cross-instance serialization
//! point), read the current reaction row inside the same transaction,
//! compute the popularity delta from the state transition, and commit both
//! writes together. A two-statement "insert row, then update counter"
//! sequence would skew the counter permanently if the second statement
//! failed after the first committed.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use blog_core::entities::ReactionState;
use blog_core::error::DomainError;
use blog_core::traits::{ReactionStore, RepoResult};
use blog_core::value_objects::{PostId, UserId};

use super::error::{map_db_error, post_not_found, with_deadline};

/// PostgreSQL implementation of ReactionStore
#[derive(Clone)]
pub struct PgReactionStore {
    pool: PgPool,
    op_timeout: Duration,
}

impl PgReactionStore {
    /// Create a new PgReactionStore bounded by `op_timeout` per operation
    pub fn new(pool: PgPool, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }

    /// Lock the post row for the rest of the transaction.
    ///
    /// Returns `PostNotFound` when the id references no post; concurrent
    /// transitions on the same post queue behind this lock.
    async fn lock_post(tx: &mut Transaction<'_, Postgres>, post_id: PostId) -> RepoResult<()> {
        let locked = sqlx::query_scalar::<_, i64>(
            r"
            SELECT popularity FROM posts WHERE id = $1 FOR UPDATE
            ",
        )
        .bind(post_id.into_inner())
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_db_error)?;

        match locked {
            Some(_) => Ok(()),
            None => Err(post_not_found(post_id)),
        }
    }

    /// Current state of the (user, post) pair, read inside the transaction
    async fn current_state(
        tx: &mut Transaction<'_, Postgres>,
        user_id: UserId,
        post_id: PostId,
    ) -> RepoResult<ReactionState> {
        let stored = sqlx::query_scalar::<_, String>(
            r"
            SELECT state FROM reactions WHERE post_id = $1 AND user_id = $2
            ",
        )
        .bind(post_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_db_error)?;

        match stored {
            None => Ok(ReactionState::Neutral),
            Some(s) => s
                .parse()
                .map_err(|e: blog_core::UnknownReactionState| DomainError::StoreUnavailable(e.to_string())),
        }
    }

    /// Apply a transition to `target` as one atomic unit of work.
    ///
    /// Idempotent: when the pair is already in `target`, nothing is written
    /// and the counter is untouched.
    async fn transition(&self, user_id: UserId, post_id: PostId, target: ReactionState) -> RepoResult<()> {
        with_deadline(self.op_timeout, async {
            let mut tx = self.pool.begin().await.map_err(map_db_error)?;

            Self::lock_post(&mut tx, post_id).await?;
            let current = Self::current_state(&mut tx, user_id, post_id).await?;

            if current == target {
                // Repeated identical request; the client retry must not
                // touch the counter.
                return Ok(());
            }

            if target.is_stored() {
                sqlx::query(
                    r"
                    INSERT INTO reactions (post_id, user_id, state, created_at, updated_at)
                    VALUES ($1, $2, $3, NOW(), NOW())
                    ON CONFLICT (post_id, user_id)
                    DO UPDATE SET state = EXCLUDED.state, updated_at = NOW()
                    ",
                )
                .bind(post_id.into_inner())
                .bind(user_id.into_inner())
                .bind(target.as_str())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            } else {
                sqlx::query(
                    r"
                    DELETE FROM reactions WHERE post_id = $1 AND user_id = $2
                    ",
                )
                .bind(post_id.into_inner())
                .bind(user_id.into_inner())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }

            let delta = current.delta_to(target);
            if delta != 0 {
                sqlx::query(
                    r"
                    UPDATE posts SET popularity = popularity + $2 WHERE id = $1
                    ",
                )
                .bind(post_id.into_inner())
                .bind(delta)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }

            tx.commit().await.map_err(map_db_error)?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ReactionStore for PgReactionStore {
    #[instrument(skip(self))]
    async fn set_like(&self, user_id: UserId, post_id: PostId) -> RepoResult<()> {
        self.transition(user_id, post_id, ReactionState::Like).await
    }

    #[instrument(skip(self))]
    async fn set_dislike(&self, user_id: UserId, post_id: PostId) -> RepoResult<()> {
        self.transition(user_id, post_id, ReactionState::Dislike).await
    }

    #[instrument(skip(self))]
    async fn remove_reaction(&self, user_id: UserId, post_id: PostId) -> RepoResult<()> {
        self.transition(user_id, post_id, ReactionState::Neutral).await
    }

    #[instrument(skip(self))]
    async fn get_reaction(&self, user_id: UserId, post_id: PostId) -> RepoResult<ReactionState> {
        with_deadline(self.op_timeout, async {
            let stored = sqlx::query_scalar::<_, String>(
                r"
                SELECT state FROM reactions WHERE post_id = $1 AND user_id = $2
                ",
            )
            .bind(post_id.into_inner())
            .bind(user_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            match stored {
                None => Ok(ReactionState::Neutral),
                Some(s) => s.parse().map_err(|e: blog_core::UnknownReactionState| {
                    DomainError::StoreUnavailable(e.to_string())
                }),
            }
        })
        .await
    }

    #[instrument(skip(self))]
    async fn verify_popularity(&self, post_id: PostId) -> RepoResult<i64> {
        with_deadline(self.op_timeout, async {
            let audit = sqlx::query_as::<_, crate::models::PopularityAuditModel>(
                r"
                SELECT p.popularity AS stored,
                       COALESCE(SUM(CASE r.state
                                    WHEN 'like' THEN 1
                                    WHEN 'dislike' THEN -1
                                    ELSE 0 END), 0)::BIGINT AS computed
                FROM posts p
                LEFT JOIN reactions r ON r.post_id = p.id
                WHERE p.id = $1
                GROUP BY p.popularity
                ",
            )
            .bind(post_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| post_not_found(post_id))?;

            if audit.stored == audit.computed {
                Ok(audit.stored)
            } else {
                Err(DomainError::InvariantViolation {
                    post_id,
                    stored: audit.stored,
                    computed: audit.computed,
                })
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgReactionStore>();
    }
}
