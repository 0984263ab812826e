//! User connection producer.

use std::sync::Arc;

use tracing::debug;

use super::sort_key::UserSortKey;
use super::store::{KeysetQuery, UserStore};
use crate::models::User;
use crate::pagination::{Connection, PaginationArgs, PaginationError, SortKey};

/// Produces paginated user connections.
#[derive(Clone)]
pub struct QueryUser {
    store: Arc<dyn UserStore>,
}

impl QueryUser {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Resolve one page of users.
    ///
    /// The sort key is checked before anything else so an unsupported key
    /// fails even when the other arguments are also wrong.
    pub async fn resolve(
        &self,
        args: &PaginationArgs,
        sort_key: &str,
    ) -> Result<Connection<User>, PaginationError> {
        let sort: UserSortKey = sort_key.parse()?;
        let page = args.validate()?;
        if let Some(ref cursor) = page.cursor {
            if !sort.accepts(&cursor.value) {
                return Err(PaginationError::invalid(format!(
                    "Invalid cursor for sortKey '{}'",
                    sort.as_str()
                )));
            }
        }

        let query = KeysetQuery {
            sort,
            ascending: page.scan_ascending(),
            cursor: page.cursor.clone(),
            limit: u64::from(page.limit) + 1,
        };
        let rows = self.store.scan(&query).await?;
        debug!(sort = sort.as_str(), rows = rows.len(), limit = page.limit, "user page");

        Ok(Connection::from_scan(sort, &page, rows))
    }
}
