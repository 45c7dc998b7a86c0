//! User service
//!
//! Account registration, profile updates, and soft deletion. Password
//! hashing happens at the edge; this layer only stores and retrieves the
//! hash.

use tracing::{info, instrument};
use validator::Validate;

use blog_core::entities::User;
use blog_core::value_objects::UserId;

use crate::dto::{RegisterUserRequest, UpdateUserRequest, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new account
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterUserRequest) -> ServiceResult<UserResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        if self.ctx.user_repo().username_exists(&request.username).await? {
            return Err(ServiceError::conflict("username already exists"));
        }

        let user = User::new(
            UserId::new(self.ctx.generate_id()),
            request.username,
            request.email,
        );
        self.ctx
            .user_repo()
            .create(&user, &request.password_hash)
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(UserResponse::from(&user))
    }

    /// Get a live user by ID
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: UserId) -> ServiceResult<UserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;
        Ok(UserResponse::from(&user))
    }

    /// Get a live user by username
    #[instrument(skip(self))]
    pub async fn get_user_by_username(&self, username: &str) -> ServiceResult<UserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", username))?;
        Ok(UserResponse::from(&user))
    }

    /// Update profile fields
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: UserId,
        request: UpdateUserRequest,
    ) -> ServiceResult<UserResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let mut user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        if let Some(email) = request.email {
            user.email = email;
        }
        if let Some(bio) = request.bio {
            user.bio = Some(bio);
        }
        if let Some(birth_date) = request.birth_date {
            user.birth_date = Some(birth_date);
        }

        self.ctx.user_repo().update(&user).await?;
        info!(user_id = %user_id, "Profile updated");
        Ok(UserResponse::from(&user))
    }

    /// Change the stored password hash
    #[instrument(skip(self, password_hash))]
    pub async fn change_password(&self, user_id: UserId, password_hash: &str) -> ServiceResult<()> {
        if password_hash.is_empty() {
            return Err(ServiceError::validation("password hash cannot be empty"));
        }
        self.ctx.user_repo().update_password(user_id, password_hash).await?;
        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Soft delete an account; the username becomes available again
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: UserId) -> ServiceResult<()> {
        self.ctx.user_repo().delete(user_id).await?;
        info!(user_id = %user_id, "User soft-deleted");
        Ok(())
    }

    /// List soft-deleted accounts (operator-facing)
    #[instrument(skip(self))]
    pub async fn list_deleted(&self) -> ServiceResult<Vec<UserResponse>> {
        let users = self.ctx.user_repo().list_deleted().await?;
        Ok(users.iter().map(UserResponse::from).collect())
    }
}
