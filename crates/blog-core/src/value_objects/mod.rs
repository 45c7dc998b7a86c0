//! Value objects - immutable domain primitives

mod generator;
mod id;

pub use generator::IdGenerator;
pub use id::{IdParseError, PostId, UserId};
