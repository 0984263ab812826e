//! HTTP route handlers.

pub mod block;
pub mod export;
pub mod group;
pub mod health;
pub mod report;
pub mod users;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the kernel router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(block::router())
        .merge(users::router())
        .merge(group::router())
        .merge(report::router())
        .merge(export::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
