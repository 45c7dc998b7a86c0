//! In-memory store backend
//!
//! Implements every store trait over one mutex-guarded state, so a reaction
//! transition and its popularity delta are applied under a single lock: the
//! same atomic-unit contract the PostgreSQL stores meet with transactions.
//! Used by tests and single-process deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use blog_core::entities::{LoginActivity, Post, Reaction, ReactionState, User};
use blog_core::error::DomainError;
use blog_core::traits::{
    LockoutTracker, PostQuery, PostRepository, ReactionStore, RepoResult, UserRepository,
};
use blog_core::value_objects::{PostId, UserId};

#[derive(Debug, Clone)]
struct UserRecord {
    user: User,
    password_hash: String,
    activity: LoginActivity,
}

#[derive(Debug, Default)]
struct State {
    posts: HashMap<PostId, Post>,
    reactions: HashMap<(PostId, UserId), Reaction>,
    users: HashMap<UserId, UserRecord>,
}

impl State {
    fn live_user_mut(&mut self, username: &str) -> Option<&mut UserRecord> {
        self.users
            .values_mut()
            .find(|r| r.user.username == username && !r.user.is_deleted())
    }

    fn live_user(&self, username: &str) -> Option<&UserRecord> {
        self.users
            .values()
            .find(|r| r.user.username == username && !r.user.is_deleted())
    }

    fn computed_popularity(&self, post_id: PostId) -> i64 {
        self.reactions
            .iter()
            .filter(|((pid, _), _)| *pid == post_id)
            .map(|(_, r)| r.state.contribution())
            .sum()
    }
}

/// In-memory backend implementing all store traits
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the stored popularity counter without touching reactions.
    /// Exists to exercise the `verify_popularity` mismatch path.
    pub fn force_popularity(&self, post_id: PostId, value: i64) {
        let mut state = self.state.lock();
        if let Some(post) = state.posts.get_mut(&post_id) {
            post.popularity = value;
        }
    }

    fn transition(&self, user_id: UserId, post_id: PostId, target: ReactionState) -> RepoResult<()> {
        let mut state = self.state.lock();

        if !state.posts.contains_key(&post_id) {
            return Err(DomainError::PostNotFound(post_id));
        }

        let key = (post_id, user_id);
        let current = state.reactions.get(&key).map_or(ReactionState::Neutral, |r| r.state);
        if current == target {
            return Ok(());
        }

        let now = Utc::now();
        if target.is_stored() {
            state
                .reactions
                .entry(key)
                .and_modify(|r| {
                    r.state = target;
                    r.updated_at = now;
                })
                .or_insert(Reaction {
                    post_id,
                    user_id,
                    state: target,
                    created_at: now,
                    updated_at: now,
                });
        } else {
            state.reactions.remove(&key);
        }

        let delta = current.delta_to(target);
        if delta != 0 {
            if let Some(post) = state.posts.get_mut(&post_id) {
                post.popularity += delta;
                post.updated_at = now;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ReactionStore for MemoryStore {
    async fn set_like(&self, user_id: UserId, post_id: PostId) -> RepoResult<()> {
        self.transition(user_id, post_id, ReactionState::Like)
    }

    async fn set_dislike(&self, user_id: UserId, post_id: PostId) -> RepoResult<()> {
        self.transition(user_id, post_id, ReactionState::Dislike)
    }

    async fn remove_reaction(&self, user_id: UserId, post_id: PostId) -> RepoResult<()> {
        self.transition(user_id, post_id, ReactionState::Neutral)
    }

    async fn get_reaction(&self, user_id: UserId, post_id: PostId) -> RepoResult<ReactionState> {
        let state = self.state.lock();
        Ok(state
            .reactions
            .get(&(post_id, user_id))
            .map_or(ReactionState::Neutral, |r| r.state))
    }

    async fn verify_popularity(&self, post_id: PostId) -> RepoResult<i64> {
        let state = self.state.lock();
        let stored = state
            .posts
            .get(&post_id)
            .map(|p| p.popularity)
            .ok_or(DomainError::PostNotFound(post_id))?;
        let computed = state.computed_popularity(post_id);

        if stored == computed {
            Ok(stored)
        } else {
            Err(DomainError::InvariantViolation { post_id, stored, computed })
        }
    }
}

#[async_trait]
impl LockoutTracker for MemoryStore {
    async fn record_failure(&self, username: &str) -> RepoResult<u32> {
        let mut state = self.state.lock();
        let record = state
            .live_user_mut(username)
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))?;

        record.activity.failed_attempts += 1;
        record.activity.last_failed_at = Some(Utc::now());
        Ok(record.activity.failed_attempts)
    }

    async fn reset(&self, username: &str) -> RepoResult<()> {
        let mut state = self.state.lock();
        let record = state
            .live_user_mut(username)
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))?;

        record.activity = LoginActivity::default();
        Ok(())
    }

    async fn load(&self, username: &str) -> RepoResult<LoginActivity> {
        let state = self.state.lock();
        state
            .live_user(username)
            .map(|r| r.activity)
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>> {
        Ok(self.state.lock().posts.get(&id).cloned())
    }

    async fn find_featured(&self, query: PostQuery) -> RepoResult<Vec<Post>> {
        let state = self.state.lock();
        let mut posts: Vec<Post> = state.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.popularity.cmp(&a.popularity).then(a.id.into_inner().cmp(&b.id.into_inner())));
        Ok(posts
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect())
    }

    async fn find_by_author(&self, author_id: UserId, query: PostQuery) -> RepoResult<Vec<Post>> {
        let state = self.state.lock();
        let mut posts: Vec<Post> = state
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.popularity.cmp(&a.popularity).then(a.id.into_inner().cmp(&b.id.into_inner())));
        Ok(posts
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect())
    }

    async fn title_exists(&self, title: &str) -> RepoResult<bool> {
        Ok(self.state.lock().posts.values().any(|p| p.title == title))
    }

    async fn create(&self, post: &Post) -> RepoResult<()> {
        let mut state = self.state.lock();
        if state.posts.contains_key(&post.id) || state.posts.values().any(|p| p.title == post.title) {
            return Err(DomainError::Conflict("post title already exists".to_string()));
        }
        state.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> RepoResult<()> {
        let mut state = self.state.lock();
        let stored = state
            .posts
            .get_mut(&post.id)
            .ok_or(DomainError::PostNotFound(post.id))?;
        stored.title = post.title.clone();
        stored.content = post.content.clone();
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: PostId) -> RepoResult<()> {
        let mut state = self.state.lock();
        if state.posts.remove(&id).is_none() {
            return Err(DomainError::PostNotFound(id));
        }
        state.reactions.retain(|(pid, _), _| *pid != id);
        Ok(())
    }

    async fn reactions(&self, id: PostId) -> RepoResult<Vec<Reaction>> {
        let state = self.state.lock();
        let mut out: Vec<Reaction> = state
            .reactions
            .iter()
            .filter(|((pid, _), _)| *pid == id)
            .map(|(_, r)| r.clone())
            .collect();
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(out)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let state = self.state.lock();
        Ok(state
            .users
            .get(&id)
            .filter(|r| !r.user.is_deleted())
            .map(|r| r.user.clone()))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let state = self.state.lock();
        Ok(state.live_user(username).map(|r| r.user.clone()))
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        Ok(self.state.lock().live_user(username).is_some())
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let mut state = self.state.lock();
        if state.users.contains_key(&user.id) || state.live_user(&user.username).is_some() {
            return Err(DomainError::Conflict("username already exists".to_string()));
        }
        state.users.insert(
            user.id,
            UserRecord {
                user: user.clone(),
                password_hash: password_hash.to_string(),
                activity: LoginActivity::default(),
            },
        );
        Ok(())
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut state = self.state.lock();
        let record = state
            .users
            .get_mut(&user.id)
            .filter(|r| !r.user.is_deleted())
            .ok_or_else(|| DomainError::UserNotFound(user.username.clone()))?;
        record.user.email = user.email.clone();
        record.user.bio = user.bio.clone();
        record.user.birth_date = user.birth_date;
        record.user.updated_at = Utc::now();
        Ok(())
    }

    async fn get_password_hash(&self, username: &str) -> RepoResult<Option<String>> {
        let state = self.state.lock();
        Ok(state.live_user(username).map(|r| r.password_hash.clone()))
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()> {
        let mut state = self.state.lock();
        let record = state
            .users
            .get_mut(&id)
            .filter(|r| !r.user.is_deleted())
            .ok_or_else(|| DomainError::UserNotFound(id.to_string()))?;
        record.password_hash = password_hash.to_string();
        record.user.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: UserId) -> RepoResult<()> {
        let mut state = self.state.lock();
        let record = state
            .users
            .get_mut(&id)
            .filter(|r| !r.user.is_deleted())
            .ok_or_else(|| DomainError::UserNotFound(id.to_string()))?;
        let now = Utc::now();
        record.user.deleted_at = Some(now);
        record.user.updated_at = now;
        Ok(())
    }

    async fn list_deleted(&self) -> RepoResult<Vec<User>> {
        let state = self.state.lock();
        let mut out: Vec<User> = state
            .users
            .values()
            .filter(|r| r.user.is_deleted())
            .map(|r| r.user.clone())
            .collect();
        out.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::entities::LockoutPolicy;

    fn store_with_post(post_id: i64) -> MemoryStore {
        let store = MemoryStore::new();
        let post = Post::new(
            PostId::new(post_id),
            UserId::new(100),
            "author".to_string(),
            format!("post {post_id}"),
            "content".to_string(),
        );
        store.state.lock().posts.insert(post.id, post);
        store
    }

    fn store_with_user(id: i64, username: &str) -> MemoryStore {
        let store = MemoryStore::new();
        let user = User::new(UserId::new(id), username.to_string(), format!("{username}@example.com"));
        store.state.lock().users.insert(
            user.id,
            UserRecord {
                user,
                password_hash: "hash".to_string(),
                activity: LoginActivity::default(),
            },
        );
        store
    }

    #[tokio::test]
    async fn test_like_then_dislike_walk() {
        let store = store_with_post(1);
        let (post, user) = (PostId::new(1), UserId::new(7));

        store.set_like(user, post).await.unwrap();
        assert_eq!(store.verify_popularity(post).await.unwrap(), 1);

        store.set_dislike(user, post).await.unwrap();
        assert_eq!(store.verify_popularity(post).await.unwrap(), -1);

        store.remove_reaction(user, post).await.unwrap();
        assert_eq!(store.verify_popularity(post).await.unwrap(), 0);
        assert_eq!(store.get_reaction(user, post).await.unwrap(), ReactionState::Neutral);
    }

    #[tokio::test]
    async fn test_repeated_like_is_idempotent() {
        let store = store_with_post(1);
        let (post, user) = (PostId::new(1), UserId::new(7));

        for _ in 0..5 {
            store.set_like(user, post).await.unwrap();
        }
        assert_eq!(store.verify_popularity(post).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remove_without_reaction_is_noop() {
        let store = store_with_post(1);
        store.remove_reaction(UserId::new(7), PostId::new(1)).await.unwrap();
        assert_eq!(store.verify_popularity(PostId::new(1)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_post_rejected() {
        let store = MemoryStore::new();
        let err = store.set_like(UserId::new(7), PostId::new(42)).await.unwrap_err();
        assert!(matches!(err, DomainError::PostNotFound(_)));
    }

    #[tokio::test]
    async fn test_distinct_users_accumulate() {
        let store = store_with_post(1);
        let post = PostId::new(1);
        for uid in 1..=10 {
            store.set_like(UserId::new(uid), post).await.unwrap();
        }
        store.set_dislike(UserId::new(11), post).await.unwrap();
        assert_eq!(store.verify_popularity(post).await.unwrap(), 9);
    }

    #[tokio::test]
    async fn test_concurrent_likes_all_counted() {
        let store = store_with_post(1);
        let post = PostId::new(1);

        let mut handles = Vec::new();
        for uid in 1..=50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.set_like(UserId::new(uid), post).await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }
        assert_eq!(store.verify_popularity(post).await.unwrap(), 50);
    }

    #[tokio::test]
    async fn test_forced_drift_detected() {
        let store = store_with_post(1);
        let post = PostId::new(1);
        store.set_like(UserId::new(7), post).await.unwrap();

        store.force_popularity(post, 99);
        let err = store.verify_popularity(post).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvariantViolation { stored: 99, computed: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_lockout_counters() {
        let store = store_with_user(1, "alice");
        let policy = LockoutPolicy::default();

        for expected in 1..=3u32 {
            assert_eq!(store.record_failure("alice").await.unwrap(), expected);
        }
        let activity = store.load("alice").await.unwrap();
        assert!(activity.is_locked_out(&policy, Utc::now()));

        store.reset("alice").await.unwrap();
        let activity = store.load("alice").await.unwrap();
        assert_eq!(activity.failed_attempts, 0);
        assert!(!activity.is_locked_out(&policy, Utc::now()));
    }

    #[tokio::test]
    async fn test_failure_after_reset_counts_from_one() {
        let store = store_with_user(1, "bob");

        for _ in 0..4 {
            store.record_failure("bob").await.unwrap();
        }
        store.reset("bob").await.unwrap();

        // Counting restarts at 1, not at the pre-reset value
        assert_eq!(store.record_failure("bob").await.unwrap(), 1);
        assert_eq!(store.load("bob").await.unwrap().failed_attempts, 1);
    }

    #[tokio::test]
    async fn test_get_reaction_unknown_post_reads_neutral() {
        let store = MemoryStore::new();
        let state = store
            .get_reaction(UserId::new(1), PostId::new(404))
            .await
            .unwrap();
        assert_eq!(state, ReactionState::Neutral);
    }

    #[tokio::test]
    async fn test_lockout_unknown_user() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.record_failure("ghost").await.unwrap_err(),
            DomainError::UserNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_user() {
        let store = store_with_user(1, "alice");
        UserRepository::delete(&store, UserId::new(1)).await.unwrap();

        assert!(UserRepository::find_by_id(&store, UserId::new(1)).await.unwrap().is_none());
        assert!(store.find_by_username("alice").await.unwrap().is_none());
        assert_eq!(store.list_deleted().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_featured_orders_by_popularity() {
        let store = MemoryStore::new();
        for id in 1..=3 {
            let post = Post::new(
                PostId::new(id),
                UserId::new(100),
                "author".to_string(),
                format!("post {id}"),
                "content".to_string(),
            );
            PostRepository::create(&store, &post).await.unwrap();
        }
        store.set_like(UserId::new(1), PostId::new(2)).await.unwrap();
        store.set_like(UserId::new(2), PostId::new(2)).await.unwrap();
        store.set_like(UserId::new(1), PostId::new(3)).await.unwrap();

        let featured = store.find_featured(PostQuery::default()).await.unwrap();
        let ids: Vec<i64> = featured.iter().map(|p| p.id.into_inner()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
