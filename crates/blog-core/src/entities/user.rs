//! User entity - a registered account

use chrono::{DateTime, Utc};

use crate::value_objects::UserId;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; reads filter on `None` unless deleted rows are
    /// explicitly requested
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new User with required fields
    pub fn new(id: UserId, username: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            bio: None,
            birth_date: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Check whether the account has been soft-deleted
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_live() {
        let user = User::new(UserId::new(1), "bob".to_string(), "bob@example.com".to_string());
        assert!(!user.is_deleted());
        assert_eq!(user.username, "bob");
    }
}
