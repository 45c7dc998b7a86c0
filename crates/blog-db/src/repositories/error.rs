//! Error handling and deadline utilities for the PostgreSQL stores

use std::future::Future;
use std::time::Duration;

use blog_core::error::DomainError;
use blog_core::value_objects::PostId;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    match e {
        SqlxError::PoolTimedOut => DomainError::Timeout,
        other => DomainError::StoreUnavailable(other.to_string()),
    }
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}

/// Create a "post not found" error
pub fn post_not_found(id: PostId) -> DomainError {
    DomainError::PostNotFound(id)
}

/// Create a "user not found" error
pub fn user_not_found(username: &str) -> DomainError {
    DomainError::UserNotFound(username.to_string())
}

/// Bound a store operation by a deadline.
///
/// On expiry the future is dropped, which releases its connection and rolls
/// back any open transaction, so the atomic unit never half-applies. The
/// caller sees `DomainError::Timeout` and may retry: every store operation
/// is idempotent or convergent under repetition.
pub async fn with_deadline<T, F>(limit: Duration, fut: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(DomainError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_deadline_passes_result_through() {
        let out = with_deadline(Duration::from_secs(1), async { Ok::<_, DomainError>(7) }).await;
        assert_eq!(out.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_with_deadline_times_out() {
        let out = with_deadline(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, DomainError>(())
        })
        .await;
        assert!(matches!(out, Err(DomainError::Timeout)));
    }

    #[tokio::test]
    async fn test_with_deadline_propagates_errors() {
        let out = with_deadline(Duration::from_secs(1), async {
            Err::<(), _>(DomainError::StoreUnavailable("down".to_string()))
        })
        .await;
        assert!(matches!(out, Err(DomainError::StoreUnavailable(_))));
    }

    #[test]
    fn test_pool_timeout_maps_to_timeout() {
        assert!(matches!(map_db_error(SqlxError::PoolTimedOut), DomainError::Timeout));
    }

    #[test]
    fn test_other_errors_map_to_store_unavailable() {
        let err = map_db_error(SqlxError::RowNotFound);
        assert!(matches!(err, DomainError::StoreUnavailable(_)));
    }
}
