//! Post service
//!
//! Post CRUD orchestration: validation, uniqueness checks, author lookup.
//! The popularity counter is never written here; it belongs to the reaction
//! store.

use tracing::{info, instrument};
use validator::Validate;

use blog_core::entities::Post;
use blog_core::traits::PostQuery;
use blog_core::value_objects::{PostId, UserId};

use crate::dto::{CreatePostRequest, PostResponse, UpdatePostRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    /// Create a new PostService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a new post authored by `author_id`
    #[instrument(skip(self, request))]
    pub async fn create_post(
        &self,
        author_id: UserId,
        request: CreatePostRequest,
    ) -> ServiceResult<PostResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let author = self
            .ctx
            .user_repo()
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", author_id.to_string()))?;

        if self.ctx.post_repo().title_exists(&request.title).await? {
            return Err(ServiceError::conflict("post title already exists"));
        }

        let post = Post::new(
            PostId::new(self.ctx.generate_id()),
            author.id,
            author.username,
            request.title,
            request.content,
        );
        self.ctx.post_repo().create(&post).await?;

        info!(post_id = %post.id, author_id = %author_id, "Post created");
        Ok(PostResponse::from(&post))
    }

    /// Get a post by ID
    #[instrument(skip(self))]
    pub async fn get_post(&self, post_id: PostId) -> ServiceResult<PostResponse> {
        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id.to_string()))?;
        Ok(PostResponse::from(&post))
    }

    /// List posts ordered by popularity, highest first
    #[instrument(skip(self))]
    pub async fn featured_posts(&self, limit: i64, offset: i64) -> ServiceResult<Vec<PostResponse>> {
        let query = PostQuery {
            limit: limit.clamp(1, 100),
            offset: offset.max(0),
        };
        let posts = self.ctx.post_repo().find_featured(query).await?;
        Ok(posts.iter().map(PostResponse::from).collect())
    }

    /// List a single author's posts ordered by popularity
    #[instrument(skip(self))]
    pub async fn posts_by_author(
        &self,
        author_id: UserId,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<PostResponse>> {
        let query = PostQuery {
            limit: limit.clamp(1, 100),
            offset: offset.max(0),
        };
        let posts = self.ctx.post_repo().find_by_author(author_id, query).await?;
        Ok(posts.iter().map(PostResponse::from).collect())
    }

    /// Update a post's title and content; only the author may edit
    #[instrument(skip(self, request))]
    pub async fn update_post(
        &self,
        actor_id: UserId,
        post_id: PostId,
        request: UpdatePostRequest,
    ) -> ServiceResult<PostResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let mut post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id.to_string()))?;

        if post.author_id != actor_id {
            return Err(ServiceError::forbidden("only the author can edit a post"));
        }

        if post.title != request.title && self.ctx.post_repo().title_exists(&request.title).await? {
            return Err(ServiceError::conflict("post title already exists"));
        }

        post.set_content(request.title, request.content);
        self.ctx.post_repo().update(&post).await?;

        info!(post_id = %post_id, "Post updated");
        Ok(PostResponse::from(&post))
    }

    /// Delete a post; its reactions go with it
    #[instrument(skip(self))]
    pub async fn delete_post(&self, actor_id: UserId, post_id: PostId) -> ServiceResult<()> {
        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id.to_string()))?;

        if post.author_id != actor_id {
            return Err(ServiceError::forbidden("only the author can delete a post"));
        }

        self.ctx.post_repo().delete(post_id).await?;
        info!(post_id = %post_id, "Post deleted");
        Ok(())
    }
}
