//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::PostId;

/// Domain layer errors
///
/// The store-facing taxonomy is deliberately small: a referenced entity is
/// absent, the deadline expired with no partial effect, or the store itself
/// failed. `InvariantViolation` is diagnostic-only; it is raised by the
/// popularity consistency check, never by normal-path operations.
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("User not found: {0}")]
    UserNotFound(String),

    // =========================================================================
    // Store Failures
    // =========================================================================
    /// Deadline exceeded; the atomic unit was rolled back, no partial effect
    #[error("Operation timed out")]
    Timeout,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    // =========================================================================
    // Validation / Conflict (surrounding CRUD layer)
    // =========================================================================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // =========================================================================
    // Diagnostics
    // =========================================================================
    /// Stored popularity counter disagrees with the reconstructed value.
    /// Indicates a bug or a prior non-atomic write path; surfaced to
    /// operators, never silently repaired.
    #[error("Popularity invariant violated for post {post_id}: stored {stored}, computed {computed}")]
    InvariantViolation {
        post_id: PostId,
        stored: i64,
        computed: i64,
    },
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::Timeout => "TIMEOUT",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::InvariantViolation { .. } => "INVARIANT_VIOLATION",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PostNotFound(_) | Self::UserNotFound(_))
    }

    /// Check if a caller may safely retry the same operation
    ///
    /// Safe because every store operation is idempotent or naturally
    /// convergent under repetition.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::StoreUnavailable(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::PostNotFound(PostId::new(1));
        assert_eq!(err.code(), "UNKNOWN_POST");

        let err = DomainError::UserNotFound("bob".to_string());
        assert_eq!(err.code(), "UNKNOWN_USER");

        assert_eq!(DomainError::Timeout.code(), "TIMEOUT");
    }

    #[test]
    fn test_is_not_found() {
        assert!(DomainError::PostNotFound(PostId::new(1)).is_not_found());
        assert!(DomainError::UserNotFound("bob".to_string()).is_not_found());
        assert!(!DomainError::Timeout.is_not_found());
    }

    #[test]
    fn test_is_retryable() {
        assert!(DomainError::Timeout.is_retryable());
        assert!(DomainError::StoreUnavailable("connection refused".to_string()).is_retryable());
        assert!(!DomainError::PostNotFound(PostId::new(1)).is_retryable());
        assert!(!DomainError::InvariantViolation {
            post_id: PostId::new(1),
            stored: 2,
            computed: 1,
        }
        .is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::PostNotFound(PostId::new(123));
        assert_eq!(err.to_string(), "Post not found: 123");

        let err = DomainError::InvariantViolation {
            post_id: PostId::new(7),
            stored: 3,
            computed: 2,
        };
        assert_eq!(
            err.to_string(),
            "Popularity invariant violated for post 7: stored 3, computed 2"
        );
    }
}
