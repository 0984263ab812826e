//! User export.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::AppResult;
use crate::state::AppState;
use crate::user_export::ExportTable;
use crate::user_query::{KeysetQuery, UserSortKey};

pub fn router() -> Router<AppState> {
    Router::new().route("/admin/people/export", get(export_users))
}

/// Export the oldest accounts, up to the configured batch size.
async fn export_users(State(state): State<AppState>) -> AppResult<Json<ExportTable>> {
    let query = KeysetQuery {
        sort: UserSortKey::CreatedAt,
        ascending: true,
        cursor: None,
        limit: state.export_batch_size(),
    };
    let users = state.user_store().scan(&query).await?;

    let table = state.exporter().export(&users).await?;
    Ok(Json(table))
}
