//! Repository traits (ports)

mod repositories;

pub use repositories::{
    LockoutTracker, PostQuery, PostRepository, ReactionStore, RepoResult, UserRepository,
};
