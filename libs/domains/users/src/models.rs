use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity. Doubles as the wire representation: camelCase field
/// names, RFC3339 timestamps, phone/address omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque identifier, assigned at creation and never reused.
    pub id: String,
    pub name: String,
    /// Stored normalized (trimmed, lowercased) and unique across users.
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh user with both timestamps set to now. Fields are
    /// expected to be already validated and normalized.
    pub fn new(
        id: String,
        name: String,
        email: String,
        phone: Option<String>,
        address: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            phone,
            address,
            created_at: now,
            updated_at: now,
        }
    }
}

/// DTO for creating a user. Unknown fields are rejected at bind time.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Patch DTO for updating a user: absent (or null) fields stay unchanged.
/// An all-absent patch is rejected with `NoUpdateData`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl UpdateUser {
    /// True when the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
    }
}
