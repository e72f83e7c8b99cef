use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::context::CallContext;
use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence.
///
/// Every operation checks the call context before touching storage and
/// returns defensive copies; callers never hold references into the
/// store. Identifier uniqueness is the repository's only invariant.
/// Email uniqueness belongs to the service.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user. Fails with `AlreadyExists` when the id is taken.
    async fn create(&self, ctx: &CallContext, user: User) -> UserResult<User>;

    /// Fetch a user by id. Fails with `NotFound` when absent.
    async fn get_by_id(&self, ctx: &CallContext, id: &str) -> UserResult<User>;

    /// Whole-record replace. Fails with `NotFound` when the id is absent.
    async fn update(&self, ctx: &CallContext, user: User) -> UserResult<User>;

    /// Remove a user by id. Fails with `NotFound` when absent.
    async fn delete(&self, ctx: &CallContext, id: &str) -> UserResult<()>;

    /// All users, in insertion order.
    async fn list(&self, ctx: &CallContext) -> UserResult<Vec<User>>;
}

/// Map entry. `seq` preserves insertion order for `list` since map
/// iteration order is unspecified.
#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    seq: u64,
}

#[derive(Debug, Default)]
struct Store {
    users: HashMap<String, StoredUser>,
    next_seq: u64,
}

/// In-memory implementation of [`UserRepository`].
///
/// Reads take the shared lock, writes the exclusive lock; records are
/// replaced wholesale under the lock, so a reader never observes a
/// partially-written record.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    inner: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record. Test helper.
    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.users.clear();
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, ctx: &CallContext, user: User) -> UserResult<User> {
        ctx.check()?;
        let mut store = self.inner.write().await;

        if store.users.contains_key(&user.id) {
            return Err(UserError::AlreadyExists);
        }

        let seq = store.next_seq;
        store.next_seq += 1;
        store.users.insert(
            user.id.clone(),
            StoredUser {
                user: user.clone(),
                seq,
            },
        );

        tracing::debug!(user_id = %user.id, "stored user");
        Ok(user)
    }

    async fn get_by_id(&self, ctx: &CallContext, id: &str) -> UserResult<User> {
        ctx.check()?;
        let store = self.inner.read().await;
        store
            .users
            .get(id)
            .map(|entry| entry.user.clone())
            .ok_or(UserError::NotFound)
    }

    async fn update(&self, ctx: &CallContext, user: User) -> UserResult<User> {
        ctx.check()?;
        let mut store = self.inner.write().await;

        match store.users.get_mut(&user.id) {
            Some(entry) => {
                entry.user = user.clone();
                tracing::debug!(user_id = %user.id, "replaced user");
                Ok(user)
            }
            None => Err(UserError::NotFound),
        }
    }

    async fn delete(&self, ctx: &CallContext, id: &str) -> UserResult<()> {
        ctx.check()?;
        let mut store = self.inner.write().await;

        if store.users.remove(id).is_none() {
            return Err(UserError::NotFound);
        }
        tracing::debug!(user_id = %id, "removed user");
        Ok(())
    }

    async fn list(&self, ctx: &CallContext) -> UserResult<Vec<User>> {
        ctx.check()?;
        let store = self.inner.read().await;

        let mut entries: Vec<&StoredUser> = store.users.values().collect();
        entries.sort_by_key(|entry| entry.seq);

        Ok(entries.into_iter().map(|entry| entry.user.clone()).collect())
    }
}
