//! Relay-style cursor pagination.
//!
//! Pages are keyset based: a cursor records the sort value and id of its
//! row, and the next page continues strictly past that pair.

pub mod args;
pub mod connection;
pub mod cursor;

use thiserror::Error;

pub use args::{Direction, PageRequest, PaginationArgs};
pub use connection::{Connection, Edge, PageInfo, SortKey};
pub use cursor::{Cursor, CursorValue};

/// The highest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Error)]
pub enum PaginationError {
    /// Bad client input: counts, cursors, or sort keys.
    #[error("{0}")]
    InvalidArgument(String),

    #[error("user store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl PaginationError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
