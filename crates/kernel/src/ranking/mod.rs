//! Ranked content selection.
//!
//! A base query narrows an entity type down to a candidate id set; for the
//! interaction sort modes a second query scores only those candidates.

pub mod memory;
pub mod pg_store;
pub mod query_builder;
pub mod selector;
pub mod store;
pub mod types;

pub use memory::MemoryContentStore;
pub use pg_store::PgContentStore;
pub use query_builder::RankingQueryBuilder;
pub use selector::RankedSelector;
pub use store::ContentStore;
pub use types::{
    FilterOperator, FilterValue, QueryFilter, RANKING_WINDOW_DAYS, RankRequest, RankedEntity,
    RankingError, RankingMode, ReferenceFilter, ReferenceSource, SelectionCriteria, SortMode,
};
