//! Data transfer objects for API requests and responses
//!
//! Request DTOs carry validation for inputs; response DTOs serialize domain
//! entities with IDs rendered as strings.

pub mod requests;
pub mod responses;

pub use requests::{CreatePostRequest, RegisterUserRequest, UpdatePostRequest, UpdateUserRequest};
pub use responses::{LockoutStatus, PostResponse, ReactionSummary, UserResponse};
