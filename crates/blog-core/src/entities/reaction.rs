//! Reaction entity - a user's recorded sentiment toward a post
//!
//! A post's `popularity` counter is a derived aggregate: it must always equal
//! the number of LIKE records minus the number of DISLIKE records for that
//! post. Every state transition therefore carries a counter delta, computed
//! here as pure arithmetic so the store can apply both writes in one atomic
//! unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{PostId, UserId};

/// Per-(user, post) reaction state
///
/// `Neutral` is the absence of a stored record; it never exists as a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionState {
    #[default]
    Neutral,
    Like,
    Dislike,
}

impl ReactionState {
    /// Contribution of this state to the post's popularity counter
    #[inline]
    pub const fn contribution(self) -> i64 {
        match self {
            Self::Neutral => 0,
            Self::Like => 1,
            Self::Dislike => -1,
        }
    }

    /// Popularity delta for a transition from `self` to `target`
    ///
    /// Identical states yield 0, which is what makes repeated requests
    /// idempotent: the store skips the write entirely when the delta-carrying
    /// transition is a self-loop.
    #[inline]
    pub const fn delta_to(self, target: ReactionState) -> i64 {
        target.contribution() - self.contribution()
    }

    /// Whether a row should exist in the store for this state
    #[inline]
    pub const fn is_stored(self) -> bool {
        !matches!(self, Self::Neutral)
    }

    /// Canonical lowercase name, matching the stored column value
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl std::fmt::Display for ReactionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReactionState {
    type Err = UnknownReactionState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "neutral" => Ok(Self::Neutral),
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            other => Err(UnknownReactionState(other.to_string())),
        }
    }
}

/// Error when decoding a stored reaction state
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reaction state: {0}")]
pub struct UnknownReactionState(pub String);

/// Stored reaction record, unique per (user, post) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub post_id: PostId,
    pub user_id: UserId,
    pub state: ReactionState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a new Reaction
    pub fn new(post_id: PostId, user_id: UserId, state: ReactionState) -> Self {
        let now = Utc::now();
        Self {
            post_id,
            user_id,
            state,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReactionState::{Dislike, Like, Neutral};

    #[test]
    fn test_contribution() {
        assert_eq!(Neutral.contribution(), 0);
        assert_eq!(Like.contribution(), 1);
        assert_eq!(Dislike.contribution(), -1);
    }

    #[test]
    fn test_delta_covers_all_transitions() {
        assert_eq!(Neutral.delta_to(Like), 1);
        assert_eq!(Neutral.delta_to(Dislike), -1);
        assert_eq!(Like.delta_to(Dislike), -2);
        assert_eq!(Dislike.delta_to(Like), 2);
        assert_eq!(Like.delta_to(Neutral), -1);
        assert_eq!(Dislike.delta_to(Neutral), 1);
    }

    #[test]
    fn test_self_transitions_are_no_ops() {
        for state in [Neutral, Like, Dislike] {
            assert_eq!(state.delta_to(state), 0);
        }
    }

    #[test]
    fn test_toggle_is_path_independent() {
        // like -> dislike -> like nets the same as a single like
        let direct = Neutral.delta_to(Like);
        let toggled = Neutral.delta_to(Like) + Like.delta_to(Dislike) + Dislike.delta_to(Like);
        assert_eq!(direct, toggled);
    }

    #[test]
    fn test_neutral_is_not_stored() {
        assert!(!Neutral.is_stored());
        assert!(Like.is_stored());
        assert!(Dislike.is_stored());
    }

    #[test]
    fn test_str_roundtrip() {
        for state in [Neutral, Like, Dislike] {
            assert_eq!(state.as_str().parse::<ReactionState>(), Ok(state));
        }
        assert!("thumbs_up".parse::<ReactionState>().is_err());
    }
}
