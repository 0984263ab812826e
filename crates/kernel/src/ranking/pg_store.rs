//! PostgreSQL content store.

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::query_builder::RankingQueryBuilder;
use super::store::ContentStore;
use super::types::{RankRequest, RankedEntity, SelectionCriteria};
use crate::models::{BlockContent, EntityRecord, EntityType};

/// Content store backed by the platform's entity tables.
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct EntityRow {
    id: i64,
    bundle: String,
    uid: Option<Uuid>,
    title: String,
    status: i16,
    created: i64,
    changed: i64,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn require_owner_column(entity_type: EntityType) -> Result<()> {
        if entity_type == EntityType::Comment {
            bail!("comments are not listed as content");
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn candidate_ids(&self, criteria: &SelectionCriteria) -> Result<Vec<i64>> {
        let sql = RankingQueryBuilder::new(criteria).build_candidates();
        debug!(entity_type = %criteria.entity_type, %sql, "candidate query");

        sqlx::query_scalar(&sql)
            .fetch_all(&self.pool)
            .await
            .context("failed to execute candidate query")
    }

    async fn select_ordered(
        &self,
        criteria: &SelectionCriteria,
        field: &str,
        limit: u64,
    ) -> Result<Vec<i64>> {
        let sql = RankingQueryBuilder::new(criteria).build_ordered(field, limit);
        debug!(entity_type = %criteria.entity_type, field, %sql, "ordered query");

        sqlx::query_scalar(&sql)
            .fetch_all(&self.pool)
            .await
            .context("failed to execute ordered query")
    }

    async fn rank(&self, request: &RankRequest) -> Result<Vec<RankedEntity>> {
        let sql = RankingQueryBuilder::build_rank(request);
        debug!(
            entity_type = %request.entity_type,
            mode = ?request.mode,
            candidates = request.candidates.len(),
            "ranking query"
        );

        // The group last-interacted join fans out; bound it.
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;

        sqlx::query("SET LOCAL statement_timeout = '10s'")
            .execute(&mut *tx)
            .await
            .context("failed to set statement timeout")?;

        let ranked = sqlx::query_as::<_, RankedEntity>(&sql)
            .fetch_all(&mut *tx)
            .await
            .context("failed to execute ranking query")?;

        tx.commit()
            .await
            .context("failed to commit ranking transaction")?;

        Ok(ranked)
    }

    async fn load_entities(
        &self,
        entity_type: EntityType,
        ids: &[i64],
    ) -> Result<Vec<EntityRecord>> {
        Self::require_owner_column(entity_type)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let title = entity_type
            .label_key()
            .map(|key| format!("COALESCE({key}, '')"))
            .unwrap_or_else(|| "''".to_string());
        let sql = format!(
            "SELECT {id} AS id, {bundle} AS bundle, uid, {title} AS title, status, created, changed \
             FROM {table} WHERE {id} = ANY($1)",
            id = entity_type.id_key(),
            bundle = entity_type.bundle_key(),
            table = entity_type.data_table(),
        );

        let rows = sqlx::query_as::<_, EntityRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("failed to load {entity_type} entities"))?;

        let mut by_id: HashMap<i64, EntityRecord> = rows
            .into_iter()
            .map(|row| {
                let record = EntityRecord {
                    entity_type,
                    id: row.id,
                    bundle: row.bundle,
                    uid: row.uid,
                    title: row.title,
                    status: row.status,
                    created: row.created,
                    changed: row.changed,
                };
                (row.id, record)
            })
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn load_block(&self, id: i64) -> Result<Option<BlockContent>> {
        BlockContent::load(&self.pool, id).await
    }

    async fn count_authored(
        &self,
        uid: Uuid,
        entity_type: EntityType,
        bundle: &str,
    ) -> Result<i64> {
        Self::require_owner_column(entity_type)?;

        let sql = format!(
            "SELECT COUNT(*) FROM {table} WHERE uid = $1 AND {bundle_key} = $2",
            table = entity_type.data_table(),
            bundle_key = entity_type.bundle_key(),
        );

        sqlx::query_scalar(&sql)
            .bind(uid)
            .bind(bundle)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("failed to count {entity_type} {bundle} for user {uid}"))
    }
}
