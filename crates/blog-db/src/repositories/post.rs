//! PostgreSQL implementation of PostRepository

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use blog_core::entities::{Post, Reaction};
use blog_core::error::DomainError;
use blog_core::traits::{PostQuery, PostRepository, RepoResult};
use blog_core::value_objects::{PostId, UserId};

use crate::mappers::decode_reaction;
use crate::models::{PostModel, ReactionModel};

use super::error::{map_db_error, map_unique_violation, post_not_found, with_deadline};

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
    op_timeout: Duration,
}

impl PgPostRepository {
    /// Create a new PgPostRepository bounded by `op_timeout` per operation
    pub fn new(pool: PgPool, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>> {
        with_deadline(self.op_timeout, async {
            let model = sqlx::query_as::<_, PostModel>(
                r"
                SELECT id, author_id, author_name, title, content, popularity,
                       created_at, updated_at
                FROM posts
                WHERE id = $1
                ",
            )
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            Ok(model.map(Post::from))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_featured(&self, query: PostQuery) -> RepoResult<Vec<Post>> {
        with_deadline(self.op_timeout, async {
            let models = sqlx::query_as::<_, PostModel>(
                r"
                SELECT id, author_id, author_name, title, content, popularity,
                       created_at, updated_at
                FROM posts
                ORDER BY popularity DESC, id ASC
                LIMIT $1 OFFSET $2
                ",
            )
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

            Ok(models.into_iter().map(Post::from).collect())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_author(&self, author_id: UserId, query: PostQuery) -> RepoResult<Vec<Post>> {
        with_deadline(self.op_timeout, async {
            let models = sqlx::query_as::<_, PostModel>(
                r"
                SELECT id, author_id, author_name, title, content, popularity,
                       created_at, updated_at
                FROM posts
                WHERE author_id = $1
                ORDER BY popularity DESC, id ASC
                LIMIT $2 OFFSET $3
                ",
            )
            .bind(author_id.into_inner())
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

            Ok(models.into_iter().map(Post::from).collect())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn title_exists(&self, title: &str) -> RepoResult<bool> {
        with_deadline(self.op_timeout, async {
            let exists = sqlx::query_scalar::<_, bool>(
                r"
                SELECT EXISTS(SELECT 1 FROM posts WHERE title = $1)
                ",
            )
            .bind(title)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

            Ok(exists)
        })
        .await
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn create(&self, post: &Post) -> RepoResult<()> {
        with_deadline(self.op_timeout, async {
            sqlx::query(
                r"
                INSERT INTO posts (id, author_id, author_name, title, content,
                                   popularity, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, 0, $6, $7)
                ",
            )
            .bind(post.id.into_inner())
            .bind(post.author_id.into_inner())
            .bind(&post.author_name)
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.created_at)
            .bind(post.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(e, || DomainError::Conflict("post title already exists".to_string()))
            })?;

            Ok(())
        })
        .await
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn update(&self, post: &Post) -> RepoResult<()> {
        with_deadline(self.op_timeout, async {
            let result = sqlx::query(
                r"
                UPDATE posts
                SET title = $2, content = $3, updated_at = NOW()
                WHERE id = $1
                ",
            )
            .bind(post.id.into_inner())
            .bind(&post.title)
            .bind(&post.content)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

            if result.rows_affected() == 0 {
                return Err(post_not_found(post.id));
            }
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: PostId) -> RepoResult<()> {
        with_deadline(self.op_timeout, async {
            // Reactions go with the post through the FK ON DELETE CASCADE.
            let result = sqlx::query(
                r"
                DELETE FROM posts WHERE id = $1
                ",
            )
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

            if result.rows_affected() == 0 {
                return Err(post_not_found(id));
            }
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn reactions(&self, id: PostId) -> RepoResult<Vec<Reaction>> {
        with_deadline(self.op_timeout, async {
            let models = sqlx::query_as::<_, ReactionModel>(
                r"
                SELECT post_id, user_id, state, created_at, updated_at
                FROM reactions
                WHERE post_id = $1
                ORDER BY updated_at DESC
                ",
            )
            .bind(id.into_inner())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

            models.into_iter().map(decode_reaction).collect()
        })
        .await
    }
}
