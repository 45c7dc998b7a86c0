//! PostgreSQL implementation of UserRepository
//!
//! Accounts are soft-deleted: `deleted_at` is stamped instead of removing
//! the row, and every live-account read filters on `deleted_at IS NULL`.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use blog_core::entities::User;
use blog_core::error::DomainError;
use blog_core::traits::{RepoResult, UserRepository};
use blog_core::value_objects::UserId;

use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation, with_deadline};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
    op_timeout: Duration,
}

impl PgUserRepository {
    /// Create a new PgUserRepository bounded by `op_timeout` per operation
    pub fn new(pool: PgPool, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        with_deadline(self.op_timeout, async {
            let model = sqlx::query_as::<_, UserModel>(
                r"
                SELECT id, username, email, bio, birth_date,
                       created_at, updated_at, deleted_at
                FROM users
                WHERE id = $1 AND deleted_at IS NULL
                ",
            )
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            Ok(model.map(User::from))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        with_deadline(self.op_timeout, async {
            let model = sqlx::query_as::<_, UserModel>(
                r"
                SELECT id, username, email, bio, birth_date,
                       created_at, updated_at, deleted_at
                FROM users
                WHERE username = $1 AND deleted_at IS NULL
                ",
            )
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            Ok(model.map(User::from))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        with_deadline(self.op_timeout, async {
            let exists = sqlx::query_scalar::<_, bool>(
                r"
                SELECT EXISTS(
                    SELECT 1 FROM users WHERE username = $1 AND deleted_at IS NULL
                )
                ",
            )
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

            Ok(exists)
        })
        .await
    }

    #[instrument(skip(self, user, password_hash), fields(user_id = %user.id))]
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        with_deadline(self.op_timeout, async {
            sqlx::query(
                r"
                INSERT INTO users (id, username, email, password_hash, bio, birth_date,
                                   failed_login_attempts, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, 0, $7, $8)
                ",
            )
            .bind(user.id.into_inner())
            .bind(&user.username)
            .bind(&user.email)
            .bind(password_hash)
            .bind(&user.bio)
            .bind(user.birth_date)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(e, || DomainError::Conflict("username already exists".to_string()))
            })?;

            Ok(())
        })
        .await
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> RepoResult<()> {
        with_deadline(self.op_timeout, async {
            let result = sqlx::query(
                r"
                UPDATE users
                SET email = $2, bio = $3, birth_date = $4, updated_at = NOW()
                WHERE id = $1 AND deleted_at IS NULL
                ",
            )
            .bind(user.id.into_inner())
            .bind(&user.email)
            .bind(&user.bio)
            .bind(user.birth_date)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

            if result.rows_affected() == 0 {
                return Err(DomainError::UserNotFound(user.username.clone()));
            }
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, username: &str) -> RepoResult<Option<String>> {
        with_deadline(self.op_timeout, async {
            let hash = sqlx::query_scalar::<_, String>(
                r"
                SELECT password_hash FROM users
                WHERE username = $1 AND deleted_at IS NULL
                ",
            )
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            Ok(hash)
        })
        .await
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()> {
        with_deadline(self.op_timeout, async {
            let result = sqlx::query(
                r"
                UPDATE users
                SET password_hash = $2, updated_at = NOW()
                WHERE id = $1 AND deleted_at IS NULL
                ",
            )
            .bind(id.into_inner())
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

            if result.rows_affected() == 0 {
                return Err(DomainError::UserNotFound(id.to_string()));
            }
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: UserId) -> RepoResult<()> {
        with_deadline(self.op_timeout, async {
            let result = sqlx::query(
                r"
                UPDATE users
                SET deleted_at = NOW(), updated_at = NOW()
                WHERE id = $1 AND deleted_at IS NULL
                ",
            )
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

            if result.rows_affected() == 0 {
                return Err(DomainError::UserNotFound(id.to_string()));
            }
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list_deleted(&self) -> RepoResult<Vec<User>> {
        with_deadline(self.op_timeout, async {
            let models = sqlx::query_as::<_, UserModel>(
                r"
                SELECT id, username, email, bio, birth_date,
                       created_at, updated_at, deleted_at
                FROM users
                WHERE deleted_at IS NOT NULL
                ORDER BY deleted_at DESC
                ",
            )
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

            Ok(models.into_iter().map(User::from).collect())
        })
        .await
    }
}
