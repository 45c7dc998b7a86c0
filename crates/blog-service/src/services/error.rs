//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use blog_common::AppError;
use blog_core::DomainError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation
    Domain(DomainError),

    /// Application error (auth, config, etc.)
    App(AppError),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// Account locked out by the failed-login policy
    Locked { retry_after_secs: i64 },

    /// Actor is not allowed to perform the operation
    Forbidden(String),

    /// Validation error
    Validation(String),

    /// Conflict (e.g., duplicate resource)
    Conflict(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::Locked { retry_after_secs } => {
                write!(f, "Account locked, retry after {retry_after_secs}s")
            }
            Self::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => match e {
                DomainError::Timeout => 504,
                DomainError::StoreUnavailable(_) => 503,
                DomainError::InvariantViolation { .. } => 500,
                _ if e.is_not_found() => 404,
                _ if e.is_validation() => 400,
                _ if e.is_conflict() => 409,
                _ => 500,
            },
            Self::App(e) => e.status_code(),
            Self::NotFound { .. } => 404,
            Self::Locked { .. } => 429,
            Self::Forbidden(_) => 403,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Locked { .. } => "ACCOUNT_LOCKED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if retrying the operation may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_retryable(),
            Self::App(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => AppError::NotFound(format!("{resource} {id}")),
            ServiceError::Locked { retry_after_secs } => AppError::AccountLocked { retry_after_secs },
            ServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::PostId;

    #[test]
    fn test_not_found_error() {
        let err = ServiceError::not_found("Post", "123");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(err.to_string().contains("Post not found: 123"));
    }

    #[test]
    fn test_locked_error() {
        let err = ServiceError::Locked { retry_after_secs: 120 };
        assert_eq!(err.status_code(), 429);
        assert_eq!(err.error_code(), "ACCOUNT_LOCKED");
    }

    #[test]
    fn test_domain_error_mapping() {
        assert_eq!(
            ServiceError::from(DomainError::PostNotFound(PostId::new(1))).status_code(),
            404
        );
        assert_eq!(ServiceError::from(DomainError::Timeout).status_code(), 504);
        assert_eq!(
            ServiceError::from(DomainError::StoreUnavailable("down".to_string())).status_code(),
            503
        );
        assert_eq!(
            ServiceError::from(DomainError::InvariantViolation {
                post_id: PostId::new(1),
                stored: 5,
                computed: 3,
            })
            .status_code(),
            500
        );
    }

    #[test]
    fn test_retryable() {
        assert!(ServiceError::from(DomainError::Timeout).is_retryable());
        assert!(!ServiceError::conflict("dup").is_retryable());
    }

    #[test]
    fn test_convert_to_app_error() {
        let service_err = ServiceError::Locked { retry_after_secs: 30 };
        let app_err: AppError = service_err.into();
        assert_eq!(app_err.status_code(), 429);
    }
}
