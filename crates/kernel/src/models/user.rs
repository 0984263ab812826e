//! User model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anonymous user UUID (nil UUID).
pub const ANONYMOUS_USER_ID: Uuid = Uuid::nil();

/// User record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing)]
    pub mail: String,
    pub status: i16,
    /// Unix timestamp when the account was created.
    pub created: i64,
    /// Profile first name.
    pub first_name: Option<String>,
    /// Profile last name.
    pub last_name: Option<String>,
}

impl User {
    /// Check if this is the anonymous user.
    pub fn is_anonymous(&self) -> bool {
        self.id == ANONYMOUS_USER_ID
    }

    /// Check if this user is active.
    pub fn is_active(&self) -> bool {
        self.status == 1
    }
}
