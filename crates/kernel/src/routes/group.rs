//! Group membership request form for anonymous visitors.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::{AppError, AppResult};
use crate::form::Form;
use crate::models::EntityType;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/group/{gid}/request-membership/anonymous",
        get(request_membership_anonymous),
    )
}

async fn request_membership_anonymous(
    State(state): State<AppState>,
    Path(gid): Path<i64>,
    headers: HeaderMap,
) -> AppResult<Json<Form>> {
    let groups = state
        .content_store()
        .load_entities(EntityType::Group, &[gid])
        .await?;
    if groups.is_empty() {
        return Err(AppError::NotFound);
    }

    let referer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok());
    let form = state.request_form().build_form(gid, referer)?;
    Ok(Json(form))
}
