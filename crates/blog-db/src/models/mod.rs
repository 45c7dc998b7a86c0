//! Database models - SQLx-compatible structs for PostgreSQL tables

mod post;
mod reaction;
mod user;

pub use post::PostModel;
pub use reaction::{PopularityAuditModel, ReactionModel};
pub use user::{LoginActivityModel, UserModel};
