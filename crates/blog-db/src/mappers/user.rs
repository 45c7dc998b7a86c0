//! User entity <-> model mapper

use blog_core::entities::{LoginActivity, User};
use blog_core::value_objects::UserId;

use crate::models::{LoginActivityModel, UserModel};

/// Convert UserModel to User entity
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: UserId::new(model.id),
            username: model.username,
            email: model.email,
            bio: model.bio,
            birth_date: model.birth_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}

/// Convert the stored counters to a LoginActivity value
impl From<LoginActivityModel> for LoginActivity {
    fn from(model: LoginActivityModel) -> Self {
        LoginActivity {
            failed_attempts: model.failed_login_attempts.max(0) as u32,
            last_failed_at: model.last_failed_login_at,
        }
    }
}
