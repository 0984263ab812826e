//! Commons kernel library.
//!
//! Ranked content selection, content list blocks, cursor-paginated user
//! listings, and the HTTP surface serving them. The `commons` binary wires
//! these to PostgreSQL; integration tests run them on the in-memory stores.

pub mod config;
pub mod content_block;
pub mod db;
pub mod error;
pub mod form;
pub mod group_request;
pub mod models;
pub mod pagination;
pub mod ranking;
pub mod report;
pub mod routes;
pub mod routing;
pub mod services;
pub mod state;
pub mod user_export;
pub mod user_query;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::{AppState, StateOptions};
