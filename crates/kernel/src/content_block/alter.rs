//! Query alter callbacks for content list blocks.
//!
//! Callbacks run after the plugin applied its filters and may add
//! conditions, change the sort, or narrow the bundle. They run in weight
//! order (lower first); equal weights keep registration order.

use std::sync::Arc;

use crate::models::BlockContent;
use crate::ranking::SelectionCriteria;

pub type QueryAlterFn = dyn Fn(&mut SelectionCriteria, &BlockContent) + Send + Sync;

struct QueryAlter {
    name: String,
    weight: i32,
    callback: Arc<QueryAlterFn>,
}

#[derive(Default)]
pub struct QueryAlterRegistry {
    alters: Vec<QueryAlter>,
}

impl QueryAlterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, weight: i32, callback: F)
    where
        F: Fn(&mut SelectionCriteria, &BlockContent) + Send + Sync + 'static,
    {
        self.alters.push(QueryAlter {
            name: name.into(),
            weight,
            callback: Arc::new(callback),
        });
        self.alters.sort_by_key(|alter| alter.weight);
    }

    /// Run every callback against the criteria.
    pub fn apply(&self, criteria: &mut SelectionCriteria, block: &BlockContent) {
        for alter in &self.alters {
            tracing::trace!(alter = %alter.name, block = block.id, "altering content block query");
            (alter.callback)(criteria, block);
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.alters.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.alters.is_empty()
    }
}

impl std::fmt::Debug for QueryAlterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryAlterRegistry")
            .field("alters", &self.names())
            .finish()
    }
}
