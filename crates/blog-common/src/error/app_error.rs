//! Application error types
//!
//! Unified error handling for the entire application. The HTTP layer maps
//! these to status codes; this is the only place it needs to know about the
//! core's error taxonomy.

use blog_core::DomainError;
use serde::Serialize;
use std::fmt;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing authentication")]
    MissingAuth,

    /// Too many failed logins inside the lockout window
    #[error("Account temporarily locked, retry after {retry_after_secs}s")]
    AccountLocked { retry_after_secs: i64 },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Resource errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Store errors (retryable)
    #[error("Operation timed out")]
    Timeout,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::Validation(_) => 400,

            // 401 Unauthorized
            Self::InvalidCredentials | Self::MissingAuth => 401,

            // 403 Forbidden
            Self::Forbidden(_) => 403,

            // 404 Not Found
            Self::NotFound(_) => 404,

            // 409 Conflict
            Self::Conflict(_) => 409,

            // 429 Too Many Requests
            Self::AccountLocked { .. } => 429,

            // 5xx
            Self::Internal(_) | Self::Config(_) => 500,
            Self::StoreUnavailable(_) => 503,
            Self::Timeout => 504,

            // Map domain errors to appropriate status codes
            Self::Domain(e) => match e {
                DomainError::Timeout => 504,
                DomainError::StoreUnavailable(_) => 503,
                _ if e.is_not_found() => 404,
                _ if e.is_validation() => 400,
                _ if e.is_conflict() => 409,
                // Invariant violations are operator-facing bugs
                _ => 500,
            },
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::MissingAuth => "MISSING_AUTH",
            Self::AccountLocked { .. } => "ACCOUNT_LOCKED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Timeout => "TIMEOUT",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Check if retrying the request may succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::StoreUnavailable(_) => true,
            Self::Domain(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        let status = self.status_code();
        (400..500).contains(&status)
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        let status = self.status_code();
        (500..600).contains(&status)
    }

    /// Create a not found error for a resource type
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::NotFound(resource.to_string())
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Error response structure for API responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            details: None,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::PostId;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::InvalidCredentials.status_code(), 401);
        assert_eq!(AppError::NotFound("post".to_string()).status_code(), 404);
        assert_eq!(AppError::Validation("test".to_string()).status_code(), 400);
        assert_eq!(AppError::AccountLocked { retry_after_secs: 60 }.status_code(), 429);
        assert_eq!(AppError::StoreUnavailable("down".to_string()).status_code(), 503);
        assert_eq!(AppError::Timeout.status_code(), 504);
    }

    #[test]
    fn test_domain_error_mapping() {
        assert_eq!(
            AppError::from(DomainError::PostNotFound(PostId::new(1))).status_code(),
            404
        );
        assert_eq!(AppError::from(DomainError::Timeout).status_code(), 504);
        assert_eq!(
            AppError::from(DomainError::StoreUnavailable("refused".to_string())).status_code(),
            503
        );
        assert_eq!(
            AppError::from(DomainError::InvariantViolation {
                post_id: PostId::new(1),
                stored: 2,
                computed: 1,
            })
            .status_code(),
            500
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(AppError::Timeout.is_retryable());
        assert!(AppError::from(DomainError::StoreUnavailable("x".to_string())).is_retryable());
        assert!(!AppError::InvalidCredentials.is_retryable());
    }

    #[test]
    fn test_error_response() {
        let err = AppError::NotFound("post".to_string());
        let response = ErrorResponse::from(&err);

        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.message, "Resource not found: post");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_is_client_and_server_error() {
        assert!(AppError::InvalidCredentials.is_client_error());
        assert!(!AppError::Timeout.is_client_error());
        assert!(AppError::Timeout.is_server_error());
    }
}
