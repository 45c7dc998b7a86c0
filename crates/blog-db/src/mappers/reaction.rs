//! Reaction entity <-> model mapper

use blog_core::entities::{Reaction, ReactionState};
use blog_core::error::DomainError;
use blog_core::traits::RepoResult;
use blog_core::value_objects::{PostId, UserId};

use crate::models::ReactionModel;

/// Convert a stored row to a Reaction entity
///
/// Fallible: an unknown `state` value means the table was written by
/// something other than the store, which is a corruption we refuse to
/// paper over.
pub fn decode_reaction(model: ReactionModel) -> RepoResult<Reaction> {
    let state: ReactionState = model
        .state
        .parse()
        .map_err(|e: blog_core::UnknownReactionState| DomainError::StoreUnavailable(e.to_string()))?;

    Ok(Reaction {
        post_id: PostId::new(model.post_id),
        user_id: UserId::new(model.user_id),
        state,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
