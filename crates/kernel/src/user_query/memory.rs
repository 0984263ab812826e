//! In-memory user store.

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;

use super::store::{KeysetQuery, UserStore};
use crate::models::User;
use crate::pagination::SortKey;

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        self.users.write().push(user);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn scan(&self, query: &KeysetQuery) -> Result<Vec<User>> {
        let users = self.users.read();
        let sort = query.sort;

        let mut rows: Vec<&User> = users
            .iter()
            .filter(|user| !user.is_anonymous())
            .filter(|user| {
                query.cursor.as_ref().is_none_or(|cursor| {
                    let position = (sort.value(user), user.id);
                    let bound = (cursor.value.clone(), cursor.id);
                    if query.ascending {
                        position > bound
                    } else {
                        position < bound
                    }
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            let ordering = (sort.value(a), a.id).cmp(&(sort.value(b), b.id));
            if query.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });

        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        Ok(rows.into_iter().take(limit).cloned().collect())
    }
}
