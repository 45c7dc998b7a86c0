//! Response DTOs
//!
//! IDs are serialized as strings for JavaScript compatibility.

use blog_core::entities::{Post, ReactionState, User};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Post response
#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub popularity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.to_string(),
            author_id: post.author_id.to_string(),
            author_name: post.author_name.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            popularity: post.popularity,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// User response (never includes the password hash)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            created_at: user.created_at,
        }
    }
}

/// A user's reaction on a post, together with the post's current popularity
#[derive(Debug, Clone, Serialize)]
pub struct ReactionSummary {
    pub state: ReactionState,
    pub popularity: i64,
}

/// Lockout decision for a username
#[derive(Debug, Clone, Serialize)]
pub struct LockoutStatus {
    pub locked: bool,
    pub failed_attempts: u32,
    /// Seconds until the lockout window expires; 0 when not locked
    pub retry_after_secs: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::value_objects::{PostId, UserId};

    #[test]
    fn test_post_response_serializes_id_as_string() {
        let post = Post::new(
            PostId::new(42),
            UserId::new(7),
            "alice".to_string(),
            "Title".to_string(),
            "Content".to_string(),
        );
        let response = PostResponse::from(&post);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], "42");
        assert_eq!(json["author_id"], "7");
        assert_eq!(json["popularity"], 0);
    }

    #[test]
    fn test_reaction_summary_serializes_lowercase() {
        let summary = ReactionSummary {
            state: ReactionState::Like,
            popularity: 3,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["state"], "like");
    }
}
