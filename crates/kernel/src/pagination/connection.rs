//! Relay connection types.

use serde::Serialize;
use uuid::Uuid;

use super::args::{Direction, PageRequest};
use super::cursor::{Cursor, CursorValue};

/// Maps a symbolic sort key onto a node's sortable value.
pub trait SortKey: Copy + Send + Sync {
    type Node;

    /// Storage field the key sorts on.
    fn field(&self) -> &'static str;

    /// Sort value of a node.
    fn value(&self, node: &Self::Node) -> CursorValue;

    /// Tie-breaking id of a node.
    fn id(node: &Self::Node) -> Uuid;

    /// Whether a cursor value has the kind this key produces.
    fn accepts(&self, value: &CursorValue) -> bool;

    fn cursor(&self, node: &Self::Node) -> Cursor {
        Cursor::new(Self::id(node), self.value(node))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Edge<T> {
    pub node: T,
    pub cursor: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    /// Build a page from rows fetched in scan order.
    ///
    /// `rows` holds up to `limit + 1` rows; the extra row only signals that
    /// more rows exist past the page.
    pub fn from_scan<K>(key: K, page: &PageRequest, mut rows: Vec<T>) -> Self
    where
        K: SortKey<Node = T>,
    {
        let limit = page.limit as usize;
        let has_more = rows.len() > limit;
        rows.truncate(limit);
        if page.direction == Direction::Backward {
            rows.reverse();
        }

        let edges: Vec<Edge<T>> = rows
            .into_iter()
            .map(|node| Edge {
                cursor: key.cursor(&node).encode(),
                node,
            })
            .collect();

        let had_cursor = page.cursor.is_some();
        let (has_next_page, has_previous_page) = match page.direction {
            Direction::Forward => (has_more, had_cursor),
            Direction::Backward => (had_cursor, has_more),
        };

        Self {
            page_info: PageInfo {
                has_next_page,
                has_previous_page,
                start_cursor: edges.first().map(|e| e.cursor.clone()),
                end_cursor: edges.last().map(|e| e.cursor.clone()),
            },
            edges,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|e| &e.node)
    }
}
