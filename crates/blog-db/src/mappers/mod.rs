//! Model <-> entity mappers

mod post;
mod reaction;
mod user;

pub use reaction::decode_reaction;
