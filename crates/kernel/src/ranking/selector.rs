//! Ranked selector: candidate query, then ranking over the candidates.

use std::sync::Arc;

use tracing::debug;

use super::store::ContentStore;
use super::types::{
    RankRequest, RankingError, RankingMode, SelectionCriteria, SortMode, sort_ranked,
};
use crate::models::EntityType;

/// Turns selection criteria into an ordered id list of at most `limit` ids.
#[derive(Clone)]
pub struct RankedSelector {
    store: Arc<dyn ContentStore>,
}

impl RankedSelector {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Select ids, measuring ranking windows from the current time.
    pub async fn select(&self, criteria: &SelectionCriteria) -> Result<Vec<i64>, RankingError> {
        self.select_at(criteria, chrono::Utc::now().timestamp()).await
    }

    /// Select ids, measuring ranking windows from `now` (Unix seconds).
    pub async fn select_at(
        &self,
        criteria: &SelectionCriteria,
        now: i64,
    ) -> Result<Vec<i64>, RankingError> {
        criteria.validate()?;

        let limit = u64::from(criteria.limit);
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mode = match criteria.sort {
            SortMode::Field(ref field) => {
                return Ok(self.store.select_ordered(criteria, field, limit).await?);
            }
            SortMode::MostCommented => RankingMode::MostCommented,
            SortMode::MostLiked => RankingMode::MostLiked,
            SortMode::LastInteracted => RankingMode::LastInteracted,
        };

        if !matches!(criteria.entity_type, EntityType::Node | EntityType::Group) {
            return Err(RankingError::UnrankableEntityType(criteria.entity_type));
        }

        let candidates = self.store.candidate_ids(criteria).await?;
        if candidates.is_empty() {
            debug!(entity_type = %criteria.entity_type, "no candidates; skipping ranking");
            return Ok(Vec::new());
        }

        let request = RankRequest {
            entity_type: criteria.entity_type,
            mode,
            window_start: mode.window_start(now),
            candidates,
            limit,
        };
        let mut ranked = self.store.rank(&request).await?;

        sort_ranked(&mut ranked);
        ranked.truncate(criteria.limit as usize);

        debug!(
            entity_type = %criteria.entity_type,
            mode = ?mode,
            candidates = request.candidates.len(),
            ranked = ranked.len(),
            "ranked selection"
        );

        Ok(ranked.into_iter().map(|r| r.id).collect())
    }
}
