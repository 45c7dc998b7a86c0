//! Service context - dependency container for services
//!
//! Holds the store trait objects, the lockout policy, and the ID generator.
//! Services borrow the context; the backend behind the trait objects is
//! either PostgreSQL or the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use blog_core::traits::{LockoutTracker, PostRepository, ReactionStore, UserRepository};
use blog_core::{IdGenerator, LockoutPolicy};
use blog_db::{MemoryStore, PgLockoutTracker, PgPostRepository, PgReactionStore, PgUserRepository};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    reaction_store: Arc<dyn ReactionStore>,
    lockout_tracker: Arc<dyn LockoutTracker>,
    post_repo: Arc<dyn PostRepository>,
    user_repo: Arc<dyn UserRepository>,
    lockout_policy: LockoutPolicy,
    id_generator: Arc<IdGenerator>,
}

impl ServiceContext {
    /// Wire the context to PostgreSQL stores sharing one pool
    pub fn postgres(pool: blog_db::PgPool, op_timeout: Duration, policy: LockoutPolicy) -> Self {
        Self {
            reaction_store: Arc::new(PgReactionStore::new(pool.clone(), op_timeout)),
            lockout_tracker: Arc::new(PgLockoutTracker::new(pool.clone(), op_timeout)),
            post_repo: Arc::new(PgPostRepository::new(pool.clone(), op_timeout)),
            user_repo: Arc::new(PgUserRepository::new(pool, op_timeout)),
            lockout_policy: policy,
            id_generator: Arc::new(IdGenerator::default()),
        }
    }

    /// Wire the context to a fresh in-memory store
    pub fn in_memory(policy: LockoutPolicy) -> Self {
        let store = MemoryStore::new();
        Self {
            reaction_store: Arc::new(store.clone()),
            lockout_tracker: Arc::new(store.clone()),
            post_repo: Arc::new(store.clone()),
            user_repo: Arc::new(store),
            lockout_policy: policy,
            id_generator: Arc::new(IdGenerator::default()),
        }
    }

    /// Get the reaction store
    pub fn reaction_store(&self) -> &dyn ReactionStore {
        self.reaction_store.as_ref()
    }

    /// Get the lockout tracker
    pub fn lockout_tracker(&self) -> &dyn LockoutTracker {
        self.lockout_tracker.as_ref()
    }

    /// Get the post repository
    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the lockout policy
    pub fn lockout_policy(&self) -> &LockoutPolicy {
        &self.lockout_policy
    }

    /// Generate a new unique ID
    pub fn generate_id(&self) -> i64 {
        self.id_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("lockout_policy", &self.lockout_policy)
            .field("stores", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext with custom stores
pub struct ServiceContextBuilder {
    reaction_store: Option<Arc<dyn ReactionStore>>,
    lockout_tracker: Option<Arc<dyn LockoutTracker>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    user_repo: Option<Arc<dyn UserRepository>>,
    lockout_policy: LockoutPolicy,
    id_generator: Option<Arc<IdGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            reaction_store: None,
            lockout_tracker: None,
            post_repo: None,
            user_repo: None,
            lockout_policy: LockoutPolicy::default(),
            id_generator: None,
        }
    }

    pub fn reaction_store(mut self, store: Arc<dyn ReactionStore>) -> Self {
        self.reaction_store = Some(store);
        self
    }

    pub fn lockout_tracker(mut self, tracker: Arc<dyn LockoutTracker>) -> Self {
        self.lockout_tracker = Some(tracker);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn lockout_policy(mut self, policy: LockoutPolicy) -> Self {
        self.lockout_policy = policy;
        self
    }

    pub fn id_generator(mut self, generator: Arc<IdGenerator>) -> Self {
        self.id_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required store is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;
        Ok(ServiceContext {
            reaction_store: self
                .reaction_store
                .ok_or_else(|| ServiceError::validation("reaction_store is required"))?,
            lockout_tracker: self
                .lockout_tracker
                .ok_or_else(|| ServiceError::validation("lockout_tracker is required"))?,
            post_repo: self
                .post_repo
                .ok_or_else(|| ServiceError::validation("post_repo is required"))?,
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            lockout_policy: self.lockout_policy,
            id_generator: self.id_generator.unwrap_or_default(),
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
