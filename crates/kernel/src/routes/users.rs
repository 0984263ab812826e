//! Paginated user listing.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::User;
use crate::pagination::{Connection, PaginationArgs};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/users", get(list_users))
}

/// Relay connection arguments.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersQuery {
    pub first: Option<i64>,
    pub after: Option<String>,
    pub last: Option<i64>,
    pub before: Option<String>,
    #[serde(default)]
    pub reverse: bool,
    #[serde(default = "default_sort_key")]
    pub sort_key: String,
}

fn default_sort_key() -> String {
    "CREATED_AT".to_string()
}

async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<UsersQuery>,
) -> AppResult<Json<Connection<User>>> {
    let args = PaginationArgs {
        first: params.first,
        after: params.after,
        last: params.last,
        before: params.before,
        reverse: params.reverse,
    };

    let connection = state.query_user().resolve(&args, &params.sort_key).await?;
    Ok(Json(connection))
}
