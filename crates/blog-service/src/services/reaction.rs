//! Reaction service
//!
//! Thin orchestration over the reaction store. Atomicity and serialization
//! live in the store; this layer adds logging and response shaping.

use tracing::{error, info, instrument};

use blog_core::value_objects::{PostId, UserId};

use crate::dto::ReactionSummary;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record a like for `(user_id, post_id)`
    #[instrument(skip(self))]
    pub async fn like_post(&self, user_id: UserId, post_id: PostId) -> ServiceResult<()> {
        self.ctx.reaction_store().set_like(user_id, post_id).await?;
        info!(user_id = %user_id, post_id = %post_id, "Post liked");
        Ok(())
    }

    /// Record a dislike for `(user_id, post_id)`
    #[instrument(skip(self))]
    pub async fn dislike_post(&self, user_id: UserId, post_id: PostId) -> ServiceResult<()> {
        self.ctx.reaction_store().set_dislike(user_id, post_id).await?;
        info!(user_id = %user_id, post_id = %post_id, "Post disliked");
        Ok(())
    }

    /// Remove any reaction for `(user_id, post_id)`
    #[instrument(skip(self))]
    pub async fn remove_reaction(&self, user_id: UserId, post_id: PostId) -> ServiceResult<()> {
        self.ctx.reaction_store().remove_reaction(user_id, post_id).await?;
        info!(user_id = %user_id, post_id = %post_id, "Reaction removed");
        Ok(())
    }

    /// The user's current reaction on a post, with the post's popularity
    #[instrument(skip(self))]
    pub async fn get_reaction(&self, user_id: UserId, post_id: PostId) -> ServiceResult<ReactionSummary> {
        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| super::error::ServiceError::not_found("Post", post_id.to_string()))?;
        let state = self.ctx.reaction_store().get_reaction(user_id, post_id).await?;
        Ok(ReactionSummary {
            state,
            popularity: post.popularity,
        })
    }

    /// Audit the popularity counter against the reaction set.
    ///
    /// A mismatch is a store bug, logged at `error` before propagating.
    #[instrument(skip(self))]
    pub async fn verify_popularity(&self, post_id: PostId) -> ServiceResult<i64> {
        match self.ctx.reaction_store().verify_popularity(post_id).await {
            Ok(value) => Ok(value),
            Err(e @ blog_core::DomainError::InvariantViolation { .. }) => {
                error!(post_id = %post_id, error = %e, "Popularity counter drifted from reaction set");
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::error::ServiceError;
    use blog_core::entities::{LockoutPolicy, Post, ReactionState};
    use blog_core::traits::PostRepository;

    async fn ctx_with_post(post_id: i64) -> ServiceContext {
        let ctx = ServiceContext::in_memory(LockoutPolicy::default());
        let post = Post::new(
            PostId::new(post_id),
            UserId::new(1),
            "author".to_string(),
            format!("Post {post_id}"),
            "content".to_string(),
        );
        ctx.post_repo().create(&post).await.unwrap();
        ctx
    }

    #[tokio::test]
    async fn test_like_dislike_walk() {
        let ctx = ctx_with_post(1).await;
        let service = ReactionService::new(&ctx);
        let (alice, bob) = (UserId::new(10), UserId::new(11));
        let post = PostId::new(1);

        service.like_post(alice, post).await.unwrap();
        service.dislike_post(bob, post).await.unwrap();
        assert_eq!(service.verify_popularity(post).await.unwrap(), 0);

        // Alice flips
        service.dislike_post(alice, post).await.unwrap();
        assert_eq!(service.verify_popularity(post).await.unwrap(), -2);

        // Bob withdraws
        service.remove_reaction(bob, post).await.unwrap();
        let summary = service.get_reaction(bob, post).await.unwrap();
        assert_eq!(summary.state, ReactionState::Neutral);
        assert_eq!(summary.popularity, -1);
    }

    #[tokio::test]
    async fn test_repeated_reaction_is_idempotent() {
        let ctx = ctx_with_post(1).await;
        let service = ReactionService::new(&ctx);
        let post = PostId::new(1);

        for _ in 0..4 {
            service.like_post(UserId::new(10), post).await.unwrap();
        }
        assert_eq!(service.verify_popularity(post).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_post_is_not_found() {
        let ctx = ServiceContext::in_memory(LockoutPolicy::default());
        let service = ReactionService::new(&ctx);

        let err = service.like_post(UserId::new(10), PostId::new(99)).await.unwrap_err();
        assert_eq!(err.status_code(), 404);

        let err = service.get_reaction(UserId::new(10), PostId::new(99)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
