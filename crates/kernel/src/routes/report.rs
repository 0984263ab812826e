//! Report listing field rendering.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use commons_sdk::render::RenderElement;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::report::{FieldContext, ResultRow};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/admin/reports/{flagging}/link", get(close_link))
}

#[derive(Debug, Deserialize)]
pub struct LinkQuery {
    /// Overrides the handler's default label.
    pub label: Option<String>,
}

async fn close_link(
    State(state): State<AppState>,
    Path(flagging): Path<i64>,
    Query(params): Query<LinkQuery>,
) -> AppResult<Json<RenderElement>> {
    let handler = state
        .field_handlers()
        .get("flagging_link_close")
        .ok_or(AppError::NotFound)?;

    let ctx = FieldContext {
        routes: state.routes(),
        locale: state.locale(),
    };
    let element = handler.render(&ResultRow::new(flagging), params.label.as_deref(), &ctx);
    Ok(Json(element))
}
