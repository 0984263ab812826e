//! Pagination arguments.

use super::cursor::Cursor;
use super::{MAX_LIMIT, PaginationError};

/// Arguments as received from the client.
#[derive(Debug, Clone, Default)]
pub struct PaginationArgs {
    /// Number of rows after `after`.
    pub first: Option<i64>,
    pub after: Option<String>,
    /// Number of rows before `before`.
    pub last: Option<i64>,
    pub before: Option<String>,
    /// Invert the sort order.
    pub reverse: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Validated page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub direction: Direction,
    pub limit: u32,
    pub cursor: Option<Cursor>,
    pub reverse: bool,
}

impl PageRequest {
    /// Whether rows are scanned in ascending (value, id) order.
    ///
    /// Forward pages scan in display order; backward pages scan against it
    /// and are flipped afterwards.
    pub fn scan_ascending(&self) -> bool {
        (self.direction == Direction::Forward) != self.reverse
    }
}

fn check_count(name: &str, count: i64) -> Result<u32, PaginationError> {
    if count < 0 {
        return Err(PaginationError::invalid(format!(
            "'{name}' must be non-negative"
        )));
    }
    if count > i64::from(MAX_LIMIT) {
        return Err(PaginationError::invalid(format!(
            "'{name}' cannot exceed {MAX_LIMIT}"
        )));
    }
    u32::try_from(count).map_err(|e| PaginationError::invalid(e.to_string()))
}

impl PaginationArgs {
    pub fn first(count: i64) -> Self {
        Self {
            first: Some(count),
            ..Self::default()
        }
    }

    pub fn last(count: i64) -> Self {
        Self {
            last: Some(count),
            ..Self::default()
        }
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Validate the arguments into a page request.
    pub fn validate(&self) -> Result<PageRequest, PaginationError> {
        let (direction, limit, cursor) = match (self.first, self.last) {
            (Some(_), Some(_)) => {
                return Err(PaginationError::invalid(
                    "Cannot specify both 'first' and 'last'",
                ));
            }
            (None, None) => {
                return Err(PaginationError::invalid(
                    "One of 'first' or 'last' must be specified",
                ));
            }
            (Some(first), None) => {
                if self.before.is_some() {
                    return Err(PaginationError::invalid(
                        "'before' cannot be used with 'first'",
                    ));
                }
                (Direction::Forward, check_count("first", first)?, &self.after)
            }
            (None, Some(last)) => {
                if self.after.is_some() {
                    return Err(PaginationError::invalid(
                        "'after' cannot be used with 'last'",
                    ));
                }
                (Direction::Backward, check_count("last", last)?, &self.before)
            }
        };

        let cursor = cursor.as_deref().map(Cursor::decode).transpose()?;

        Ok(PageRequest {
            direction,
            limit,
            cursor,
            reverse: self.reverse,
        })
    }
}
