//! Domain entities - core business objects

mod login_activity;
mod post;
mod reaction;
mod user;

pub use login_activity::{LockoutPolicy, LoginActivity};
pub use post::Post;
pub use reaction::{Reaction, ReactionState, UnknownReactionState};
pub use user::User;
