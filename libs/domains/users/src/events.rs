use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::models::User;

/// Channel endpoint the service hands events to. Owned by the consumer;
/// the service keeps nothing after emission.
pub type EventSender = mpsc::Sender<UserEvent>;

/// Lifecycle event emitted after a successful create/update/delete.
///
/// Delivery is best-effort: a consumer that is not ready when the calling
/// context gets cancelled loses the event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum UserEvent {
    Created { user: User, at: DateTime<Utc> },
    Updated { user: User, at: DateTime<Utc> },
    /// Carries the snapshot taken before removal.
    Deleted { user: User, at: DateTime<Utc> },
}

impl UserEvent {
    pub fn created(user: User) -> Self {
        UserEvent::Created {
            user,
            at: Utc::now(),
        }
    }

    pub fn updated(user: User) -> Self {
        UserEvent::Updated {
            user,
            at: Utc::now(),
        }
    }

    pub fn deleted(user: User) -> Self {
        UserEvent::Deleted {
            user,
            at: Utc::now(),
        }
    }

    /// The identifier of the affected user.
    pub fn user_id(&self) -> &str {
        match self {
            UserEvent::Created { user, .. }
            | UserEvent::Updated { user, .. }
            | UserEvent::Deleted { user, .. } => &user.id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            UserEvent::Created { .. } => "created",
            UserEvent::Updated { .. } => "updated",
            UserEvent::Deleted { .. } => "deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            "7".to_string(),
            "Alice".to_string(),
            "alice@example.com".to_string(),
            None,
            None,
        )
    }

    #[test]
    fn test_event_exposes_kind_and_user_id() {
        let event = UserEvent::deleted(sample_user());
        assert_eq!(event.kind(), "deleted");
        assert_eq!(event.user_id(), "7");
    }

    #[test]
    fn test_event_serializes_with_kind_tag() {
        let value = serde_json::to_value(UserEvent::created(sample_user())).unwrap();
        assert_eq!(value["kind"], "created");
        assert_eq!(value["user"]["email"], "alice@example.com");
        assert!(value.get("at").is_some());
    }
}
