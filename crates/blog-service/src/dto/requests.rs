//! Request DTOs with validation

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

/// Create a new post
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "content cannot be empty"))]
    pub content: String,
}

/// Update an existing post's title and content
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "content cannot be empty"))]
    pub content: String,
}

/// Register a new user account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 3, max = 64, message = "username must be 3-64 characters"))]
    pub username: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    /// Already-hashed password; hashing happens at the edge
    #[validate(length(min = 1, message = "password hash cannot be empty"))]
    pub password_hash: String,
}

/// Update a user's profile fields
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 1000, message = "bio too long"))]
    pub bio: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_post_validation() {
        let ok = CreatePostRequest {
            title: "Hello".to_string(),
            content: "World".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty_title = CreatePostRequest {
            title: String::new(),
            content: "World".to_string(),
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_register_validation() {
        let bad_email = RegisterUserRequest {
            username: "alice".to_string(),
            email: "not-an-email".to_string(),
            password_hash: "hash".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_name = RegisterUserRequest {
            username: "ab".to_string(),
            email: "a@example.com".to_string(),
            password_hash: "hash".to_string(),
        };
        assert!(short_name.validate().is_err());
    }
}
