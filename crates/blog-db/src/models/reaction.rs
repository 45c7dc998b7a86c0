//! Reaction database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the reactions table
///
/// `state` holds the canonical lowercase name ("like" / "dislike"); a
/// NEUTRAL reaction is the absence of a row, never a stored value.
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub post_id: i64,
    pub user_id: i64,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of the popularity consistency check (from query)
#[derive(Debug, Clone, FromRow)]
pub struct PopularityAuditModel {
    pub stored: i64,
    pub computed: i64,
}
