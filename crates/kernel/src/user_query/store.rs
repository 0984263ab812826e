//! User store abstraction.

use anyhow::Result;
use async_trait::async_trait;

use super::sort_key::UserSortKey;
use crate::models::User;
use crate::pagination::Cursor;

/// One keyset scan over the users table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysetQuery {
    pub sort: UserSortKey,
    /// Scan in ascending (value, id) order; descending otherwise.
    pub ascending: bool,
    /// Only rows strictly past this position in scan order.
    pub cursor: Option<Cursor>,
    pub limit: u64,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Users in scan order, never including the anonymous user.
    async fn scan(&self, query: &KeysetQuery) -> Result<Vec<User>>;
}
