//! Content store abstraction.
//!
//! The selector and the block builder only talk to storage through this
//! trait. [`PgContentStore`](super::PgContentStore) runs the generated SQL;
//! [`MemoryContentStore`](super::MemoryContentStore) evaluates the same
//! semantics over in-process records.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use super::types::{RankRequest, RankedEntity, SelectionCriteria};
use crate::models::{BlockContent, EntityRecord, EntityType};

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Ids matching the criteria filters, ascending by id. Sort and limit
    /// are ignored.
    async fn candidate_ids(&self, criteria: &SelectionCriteria) -> Result<Vec<i64>>;

    /// Ids matching the criteria filters ordered ascending by a base table
    /// column, ties by id.
    async fn select_ordered(
        &self,
        criteria: &SelectionCriteria,
        field: &str,
        limit: u64,
    ) -> Result<Vec<i64>>;

    /// Score the request's candidates. Output is ordered by score
    /// descending, then id ascending, and never longer than the limit.
    async fn rank(&self, request: &RankRequest) -> Result<Vec<RankedEntity>>;

    /// Load entity records, in the order of `ids`. Missing ids are skipped.
    async fn load_entities(&self, entity_type: EntityType, ids: &[i64])
    -> Result<Vec<EntityRecord>>;

    async fn load_block(&self, id: i64) -> Result<Option<BlockContent>>;

    /// Number of entities of a bundle owned by a user.
    async fn count_authored(&self, uid: Uuid, entity_type: EntityType, bundle: &str)
    -> Result<i64>;
}
