//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Failed-login counters, read from the users row
#[derive(Debug, Clone, FromRow)]
pub struct LoginActivityModel {
    pub failed_login_attempts: i32,
    pub last_failed_login_at: Option<DateTime<Utc>>,
}
