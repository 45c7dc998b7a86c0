//! # blog-core
//!
//! Domain layer containing entities, value objects, repository traits, and the
//! domain error taxonomy. This crate has zero dependencies on infrastructure
//! (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    LockoutPolicy, LoginActivity, Post, Reaction, ReactionState, UnknownReactionState, User,
};
pub use error::DomainError;
pub use traits::{
    LockoutTracker, PostQuery, PostRepository, ReactionStore, RepoResult, UserRepository,
};
pub use value_objects::{IdGenerator, IdParseError, PostId, UserId};
