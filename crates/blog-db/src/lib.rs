//! # blog-db
//!
//! Persistence layer implementing the store traits from `blog-core`.
//!
//! ## Overview
//!
//! Two backend variants implement the same capability interface (atomic
//! read-modify-write, existence check, deadline-bounded call):
//!
//! - PostgreSQL via SQLx: connection pool management, `FromRow` models,
//!   repository implementations. Every reaction mutation runs inside one
//!   transaction with row-level locking on the post row, so the reaction
//!   state change and the popularity delta commit or roll back together.
//! - In-memory: a mutex-guarded store used in tests and single-process
//!   deployments.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blog_db::pool::{create_pool, DatabaseConfig};
//! use blog_db::repositories::PgReactionStore;
//! use blog_core::traits::ReactionStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let reactions = PgReactionStore::new(pool, config.statement_timeout);
//!
//!     // Use the store...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{
    MemoryStore, PgLockoutTracker, PgPostRepository, PgReactionStore, PgUserRepository,
};
