//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Two store variants exist (PostgreSQL and
//! in-memory); the domain never branches on backend kind.

use async_trait::async_trait;

use crate::entities::{LoginActivity, Post, Reaction, ReactionState, User};
use crate::error::DomainError;
use crate::value_objects::{PostId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Reaction Store
// ============================================================================

/// Per-user reaction state on posts, and the post popularity counter it
/// drives.
///
/// Contract for every mutating operation:
/// - the reaction row change and the popularity delta land as one atomic
///   unit of work, or neither does;
/// - operations are idempotent: repeating a call after a successful or
///   uncertain application leaves the same end state and counter value;
/// - concurrent calls on the same (user, post) pair are serialized by the
///   store (row-level locking), never by in-process locks;
/// - mutating operations return `PostNotFound` when the post id references
///   no live post.
#[async_trait]
pub trait ReactionStore: Send + Sync {
    /// Record a like. NEUTRAL→LIKE adds +1, DISLIKE→LIKE adds +2,
    /// LIKE→LIKE is a no-op.
    async fn set_like(&self, user_id: UserId, post_id: PostId) -> RepoResult<()>;

    /// Record a dislike. NEUTRAL→DISLIKE adds -1, LIKE→DISLIKE adds -2,
    /// DISLIKE→DISLIKE is a no-op.
    async fn set_dislike(&self, user_id: UserId, post_id: PostId) -> RepoResult<()>;

    /// Remove any reaction. Absent record is a no-op; removing LIKE adds -1,
    /// removing DISLIKE adds +1.
    async fn remove_reaction(&self, user_id: UserId, post_id: PostId) -> RepoResult<()>;

    /// Pure read of the current state; absence of a record is `Neutral`.
    /// Does not check post existence, so an unknown post also reads as
    /// `Neutral`; callers wanting a 404 resolve the post first.
    async fn get_reaction(&self, user_id: UserId, post_id: PostId) -> RepoResult<ReactionState>;

    /// Diagnostic: recompute #LIKE - #DISLIKE over the reaction set and
    /// compare with the stored counter. Returns the verified value on
    /// success, `InvariantViolation` on mismatch. Not a hot-path operation.
    async fn verify_popularity(&self, post_id: PostId) -> RepoResult<i64>;
}

// ============================================================================
// Lockout Tracker
// ============================================================================

/// Durable failed-login-attempt counters, keyed by username.
///
/// The increment is a single atomic statement on the store side
/// (`count = count + 1`), never a read-modify-write through the caller's
/// memory, so concurrent failures from the same username are all counted.
#[async_trait]
pub trait LockoutTracker: Send + Sync {
    /// Atomically increment the failed-attempt count and stamp the failure
    /// time. Returns the new count.
    async fn record_failure(&self, username: &str) -> RepoResult<u32>;

    /// Atomically reset the count to zero. Called exactly once per
    /// successful authentication.
    async fn reset(&self, username: &str) -> RepoResult<()>;

    /// Read the current activity; the lockout decision itself is computed
    /// by the caller from policy, never stored.
    async fn load(&self, username: &str) -> RepoResult<LoginActivity>;
}

// ============================================================================
// Post Repository
// ============================================================================

/// Pagination options for post listings
#[derive(Debug, Clone)]
pub struct PostQuery {
    pub limit: i64,
    pub offset: i64,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self { limit: 20, offset: 0 }
    }
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID
    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>>;

    /// List posts ordered by popularity, highest first
    async fn find_featured(&self, query: PostQuery) -> RepoResult<Vec<Post>>;

    /// List a single author's posts ordered by popularity
    async fn find_by_author(&self, author_id: UserId, query: PostQuery) -> RepoResult<Vec<Post>>;

    /// Check if a post title is already taken
    async fn title_exists(&self, title: &str) -> RepoResult<bool>;

    /// Create a new post
    async fn create(&self, post: &Post) -> RepoResult<()>;

    /// Update title and content
    async fn update(&self, post: &Post) -> RepoResult<()>;

    /// Delete a post; reactions cascade with it
    async fn delete(&self, id: PostId) -> RepoResult<()>;

    /// All reactions currently recorded for a post
    async fn reactions(&self, id: PostId) -> RepoResult<Vec<Reaction>>;
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID (live accounts only)
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Find user by username (live accounts only)
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Check if a username belongs to a live account
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Create a new user
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Update profile fields (never the password)
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, username: &str) -> RepoResult<Option<String>>;

    /// Update password hash
    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()>;

    /// Soft delete a user
    async fn delete(&self, id: UserId) -> RepoResult<()>;

    /// List soft-deleted accounts
    async fn list_deleted(&self) -> RepoResult<Vec<User>>;
}
