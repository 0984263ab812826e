//! PostgreSQL user store.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_query::{Alias, Expr, Order, PostgresQueryBuilder, Query, SimpleExpr};
use sqlx::PgPool;
use tracing::debug;

use super::store::{KeysetQuery, UserStore};
use crate::models::{ANONYMOUS_USER_ID, User};
use crate::pagination::CursorValue;

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build the keyset scan.
    pub fn build_scan(query: &KeysetQuery) -> String {
        let sort_expr = || Expr::cust(query.sort.sql_expr());
        let order = if query.ascending {
            Order::Asc
        } else {
            Order::Desc
        };

        let mut select = Query::select();
        select
            .columns(
                [
                    "id",
                    "name",
                    "mail",
                    "status",
                    "created",
                    "first_name",
                    "last_name",
                ]
                .map(Alias::new),
            )
            .from(Alias::new("users"))
            .and_where(Expr::col(Alias::new("id")).ne(ANONYMOUS_USER_ID));

        if let Some(ref cursor) = query.cursor {
            let value: SimpleExpr = match cursor.value {
                CursorValue::Integer(i) => i.into(),
                CursorValue::Text(ref s) => s.clone().into(),
            };
            let row = Expr::tuple([sort_expr(), Expr::col(Alias::new("id")).into()]);
            let position = Expr::tuple([value, cursor.id.into()]);
            select.and_where(if query.ascending {
                row.gt(position)
            } else {
                row.lt(position)
            });
        }

        select
            .order_by_expr(sort_expr(), order.clone())
            .order_by(Alias::new("id"), order)
            .limit(query.limit);

        select.to_string(PostgresQueryBuilder)
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn scan(&self, query: &KeysetQuery) -> Result<Vec<User>> {
        let sql = Self::build_scan(query);
        debug!(sort = query.sort.as_str(), ascending = query.ascending, "user keyset scan");

        sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await
            .context("failed to scan users")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::Cursor;
    use crate::user_query::UserSortKey;
    use uuid::Uuid;

    #[test]
    fn first_page_excludes_anonymous_and_orders_by_key() {
        let sql = PgUserStore::build_scan(&KeysetQuery {
            sort: UserSortKey::CreatedAt,
            ascending: true,
            cursor: None,
            limit: 11,
        });

        assert!(sql.contains("FROM \"users\""), "{sql}");
        assert!(
            sql.contains("\"id\" <> '00000000-0000-0000-0000-000000000000'"),
            "{sql}"
        );
        assert!(sql.contains("ORDER BY created ASC, \"id\" ASC"), "{sql}");
        assert!(sql.contains("LIMIT 11"), "{sql}");
    }

    #[test]
    fn cursor_continues_past_position() {
        let id = Uuid::now_v7();
        let sql = PgUserStore::build_scan(&KeysetQuery {
            sort: UserSortKey::LastName,
            ascending: false,
            cursor: Some(Cursor::new(id, CursorValue::Text("Lovelace".to_string()))),
            limit: 6,
        });

        assert!(sql.contains("COALESCE(last_name, '') COLLATE \"C\""), "{sql}");
        assert!(sql.contains("'Lovelace'"), "{sql}");
        assert!(sql.contains(&id.to_string()), "{sql}");
        assert!(sql.contains(" < "), "{sql}");
        assert!(sql.contains("\"id\" DESC"), "{sql}");
    }
}
