//! Post entity - a published blog post
//!
//! `popularity` is derived state (#LIKE - #DISLIKE over the reactions for
//! this post). It is mutated only inside the reaction store's atomic
//! operations; no other code path writes it.

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::value_objects::{PostId, UserId};

/// Post entity
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub author_name: String,
    #[validate(length(min = 1, message = "post title cannot be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "post content cannot be empty"))]
    pub content: String,
    /// Derived counter, read-only outside the reaction store
    pub popularity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new Post with required fields
    pub fn new(id: PostId, author_id: UserId, author_name: String, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            author_id,
            author_name,
            title,
            content,
            popularity: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the title and content
    pub fn set_content(&mut self, title: String, content: String) {
        self.title = title;
        self.content = content;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_post(title: &str, content: &str) -> Post {
        Post::new(
            PostId::new(1),
            UserId::new(10),
            "alice".to_string(),
            title.to_string(),
            content.to_string(),
        )
    }

    #[test]
    fn test_new_post_starts_neutral() {
        let post = test_post("Hello", "World");
        assert_eq!(post.popularity, 0);
    }

    #[test]
    fn test_validation_rejects_empty_title() {
        assert!(test_post("", "content").validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_content() {
        assert!(test_post("title", "").validate().is_err());
    }

    #[test]
    fn test_validation_accepts_non_empty() {
        assert!(test_post("title", "content").validate().is_ok());
    }
}
