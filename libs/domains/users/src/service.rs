use std::sync::Arc;

use chrono::Utc;

use crate::context::CallContext;
use crate::error::{UserError, UserResult};
use crate::events::{EventSender, UserEvent};
use crate::ids::IdGenerator;
use crate::models::{CreateUser, UpdateUser, User};
use crate::repository::UserRepository;
use crate::validation::{validate_email, validate_name, validate_phone};

/// Service layer for user business logic: validation, email uniqueness,
/// identifier/timestamp assignment and lifecycle events.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    ids: Arc<IdGenerator>,
    events: Option<EventSender>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            ids: Arc::new(IdGenerator::sequential()),
            events: None,
        }
    }

    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    /// Register the consumer-owned channel lifecycle events are handed to.
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Validate, enforce email uniqueness, persist and emit `created`.
    pub async fn create_user(&self, ctx: &CallContext, input: CreateUser) -> UserResult<User> {
        ctx.check()?;

        let name = validate_name(&input.name)?;
        let email = validate_email(&input.email)?;
        let phone = validate_phone(input.phone.as_deref().unwrap_or(""))?;
        let address = normalize_address(input.address);

        // Email uniqueness is enforced here, not in the repository: the
        // store only knows about identifiers.
        if self.find_by_email(ctx, &email).await?.is_some() {
            return Err(UserError::AlreadyExists);
        }

        let user = User::new(self.ids.generate(), name, email, phone, address);
        let created = self.repository.create(ctx, user).await?;

        self.emit(ctx, UserEvent::created(created.clone())).await;
        Ok(created)
    }

    pub async fn get_user(&self, ctx: &CallContext, id: &str) -> UserResult<User> {
        ctx.check()?;
        self.repository.get_by_id(ctx, id).await
    }

    /// Normalized-email lookup. A missing user is `None`, not an error.
    pub async fn find_by_email(&self, ctx: &CallContext, email: &str) -> UserResult<Option<User>> {
        ctx.check()?;
        let needle = email.trim().to_lowercase();
        let users = self.repository.list(ctx).await?;
        Ok(users.into_iter().find(|user| user.email == needle))
    }

    /// All users, sorted by creation time ascending. The sort is stable,
    /// so records created in the same instant keep insertion order.
    pub async fn list_users(&self, ctx: &CallContext) -> UserResult<Vec<User>> {
        ctx.check()?;
        let mut users = self.repository.list(ctx).await?;
        users.sort_by_key(|user| user.created_at);
        Ok(users)
    }

    /// Merge a patch into an existing user. `updated_at` is bumped, the
    /// record persisted and `updated` emitted only when a field actually
    /// changed; a no-op patch returns the record untouched.
    pub async fn update_user(
        &self,
        ctx: &CallContext,
        id: &str,
        patch: UpdateUser,
    ) -> UserResult<User> {
        ctx.check()?;

        if patch.is_empty() {
            return Err(UserError::NoUpdateData);
        }

        let mut user = self.repository.get_by_id(ctx, id).await?;
        let mut changed = false;

        if let Some(raw) = patch.name {
            let name = validate_name(&raw)?;
            if user.name != name {
                user.name = name;
                changed = true;
            }
        }

        if let Some(raw) = patch.email {
            let email = validate_email(&raw)?;
            if user.email != email {
                if self.find_by_email(ctx, &email).await?.is_some() {
                    return Err(UserError::AlreadyExists);
                }
                user.email = email;
                changed = true;
            }
        }

        if let Some(raw) = patch.phone {
            // A blank value clears the phone.
            let phone = validate_phone(&raw)?;
            if user.phone != phone {
                user.phone = phone;
                changed = true;
            }
        }

        if let Some(raw) = patch.address {
            let address = normalize_address(Some(raw));
            if user.address != address {
                user.address = address;
                changed = true;
            }
        }

        if !changed {
            return Ok(user);
        }

        user.updated_at = Utc::now();
        let updated = self.repository.update(ctx, user).await?;

        self.emit(ctx, UserEvent::updated(updated.clone())).await;
        Ok(updated)
    }

    /// Delete a user, emitting `deleted` with the pre-deletion snapshot.
    pub async fn delete_user(&self, ctx: &CallContext, id: &str) -> UserResult<()> {
        ctx.check()?;

        let snapshot = self.repository.get_by_id(ctx, id).await?;
        self.repository.delete(ctx, id).await?;

        self.emit(ctx, UserEvent::deleted(snapshot)).await;
        Ok(())
    }

    /// Best-effort event hand-off: skipped when no consumer is
    /// registered; a consumer that is not ready races the caller's
    /// cancellation and the event is dropped when the caller gives up.
    async fn emit(&self, ctx: &CallContext, event: UserEvent) {
        let Some(events) = &self.events else {
            return;
        };

        tokio::select! {
            result = events.send(event) => {
                if result.is_err() {
                    tracing::debug!("event consumer gone, discarding event");
                }
            }
            _ = ctx.cancelled() => {
                tracing::debug!("caller gave up, discarding event");
            }
        }
    }
}

fn normalize_address(address: Option<String>) -> Option<String> {
    address
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
}
