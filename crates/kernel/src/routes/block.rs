//! Content list block rendering.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use commons_sdk::render::RenderElement;

use crate::content_block::BLOCK_CONTENT_ENTITY_TYPE;
use crate::error::{AppError, AppResult};
use crate::models::CONTENT_LIST_BUNDLE;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/block/{id}/content", get(block_content))
}

/// Render tree of a content list block; 404 when there is no such block.
async fn block_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RenderElement>> {
    let element = state
        .content_builder()
        .build(id, BLOCK_CONTENT_ENTITY_TYPE, CONTENT_LIST_BUNDLE)
        .await;

    if element.is_empty() {
        return Err(AppError::NotFound);
    }
    Ok(Json(element))
}
