//! Store implementations
//!
//! PostgreSQL implementations of the store traits defined in blog-core,
//! plus the in-memory variant used by tests and single-process deployments.

mod error;
mod lockout;
mod memory;
mod post;
mod reaction;
mod user;

pub use lockout::PgLockoutTracker;
pub use memory::MemoryStore;
pub use post::PgPostRepository;
pub use reaction::PgReactionStore;
pub use user::PgUserRepository;
