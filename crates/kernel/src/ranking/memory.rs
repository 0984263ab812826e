//! In-memory content store.
//!
//! Evaluates the same filter and ranking semantics as the generated SQL,
//! including the row fan-out of the group join paths, so selector behaviour
//! can be exercised without a database.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use super::store::ContentStore;
use super::types::{
    FilterOperator, FilterValue, QueryFilter, RankRequest, RankedEntity, RankingMode,
    ReferenceFilter, ReferenceSource, SelectionCriteria, sort_ranked,
};
use crate::models::{
    BlockContent, Comment, EntityRecord, EntityReference, EntityType, GroupContent, PostRecipient,
    Vote,
};

#[derive(Default)]
struct MemoryData {
    entities: BTreeMap<(EntityType, i64), EntityRecord>,
    references: Vec<EntityReference>,
    comments: Vec<Comment>,
    votes: Vec<Vote>,
    group_content: Vec<GroupContent>,
    post_recipients: Vec<PostRecipient>,
    blocks: HashMap<i64, BlockContent>,
}

/// Content store holding every record in process memory.
#[derive(Default)]
pub struct MemoryContentStore {
    data: RwLock<MemoryData>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_entity(&self, record: EntityRecord) {
        self.data
            .write()
            .entities
            .insert((record.entity_type, record.id), record);
    }

    pub fn insert_reference(&self, reference: EntityReference) {
        self.data.write().references.push(reference);
    }

    pub fn insert_comment(&self, comment: Comment) {
        self.data.write().comments.push(comment);
    }

    pub fn insert_vote(&self, vote: Vote) {
        self.data.write().votes.push(vote);
    }

    pub fn insert_group_content(&self, relation: GroupContent) {
        self.data.write().group_content.push(relation);
    }

    pub fn insert_post_recipient(&self, recipient: PostRecipient) {
        self.data.write().post_recipients.push(recipient);
    }

    pub fn insert_block(&self, block: BlockContent) {
        self.data.write().blocks.insert(block.id, block);
    }
}

impl MemoryData {
    fn matching(&self, criteria: &SelectionCriteria) -> Vec<&EntityRecord> {
        self.entities
            .values()
            .filter(|record| record.entity_type == criteria.entity_type)
            .filter(|record| {
                criteria
                    .bundle
                    .as_ref()
                    .is_none_or(|bundle| &record.bundle == bundle)
            })
            .filter(|record| {
                criteria
                    .references
                    .iter()
                    .all(|reference| self.references_any(record, reference))
            })
            .filter(|record| {
                criteria
                    .conditions
                    .iter()
                    .all(|filter| condition_matches(record.column(&filter.field), filter))
            })
            .collect()
    }

    fn references_any(&self, record: &EntityRecord, reference: &ReferenceFilter) -> bool {
        let targets = &reference.target_ids;
        match &reference.source {
            ReferenceSource::Field(field) => self.references.iter().any(|r| {
                r.entity_type == record.entity_type
                    && r.entity_id == record.id
                    && &r.field_name == field
                    && targets.contains(&r.target_id)
            }),
            ReferenceSource::GroupMembership => self.group_content.iter().any(|gc| {
                gc.entity_type == record.entity_type
                    && gc.entity_id == record.id
                    && targets.contains(&gc.gid)
            }),
        }
    }

    /// Group ids of the joined rows for an interaction on
    /// `(entity_type, entity_id)`: group content rows times recipient rows,
    /// each side contributing one empty row when nothing matches, and the
    /// group-content side winning.
    fn group_rows(&self, entity_type: EntityType, entity_id: i64) -> Vec<Option<i64>> {
        let mut via_posts: Vec<Option<i64>> = if entity_type == EntityType::Post {
            self.post_recipients
                .iter()
                .filter(|r| r.post_id == entity_id)
                .map(|r| Some(r.group_id))
                .collect()
        } else {
            Vec::new()
        };
        if via_posts.is_empty() {
            via_posts.push(None);
        }

        let mut via_content: Vec<Option<i64>> = self
            .group_content
            .iter()
            .filter(|gc| gc.entity_type == entity_type && gc.entity_id == entity_id)
            .map(|gc| Some(gc.gid))
            .collect();
        if via_content.is_empty() {
            via_content.push(None);
        }

        via_posts
            .iter()
            .flat_map(|post_gid| via_content.iter().map(move |gid| gid.or(*post_gid)))
            .collect()
    }

    fn count_by_group(
        &self,
        interactions: impl Iterator<Item = (EntityType, i64)>,
        candidates: &HashSet<i64>,
    ) -> Vec<RankedEntity> {
        let mut counts: HashMap<i64, i64> = HashMap::new();
        for (entity_type, entity_id) in interactions {
            for gid in self.group_rows(entity_type, entity_id).into_iter().flatten() {
                if candidates.contains(&gid) {
                    *counts.entry(gid).or_default() += 1;
                }
            }
        }
        counts
            .into_iter()
            .map(|(id, score)| RankedEntity { id, score })
            .collect()
    }

    fn count_direct(
        &self,
        request: &RankRequest,
        interactions: impl Iterator<Item = i64>,
        candidates: &HashSet<i64>,
    ) -> Vec<RankedEntity> {
        let mut counts: HashMap<i64, i64> = HashMap::new();
        for entity_id in interactions {
            if candidates.contains(&entity_id)
                && self
                    .entities
                    .contains_key(&(request.entity_type, entity_id))
            {
                *counts.entry(entity_id).or_default() += 1;
            }
        }
        counts
            .into_iter()
            .map(|(id, score)| RankedEntity { id, score })
            .collect()
    }

    fn in_window(timestamp: i64, window_start: Option<i64>) -> bool {
        window_start.is_none_or(|start| timestamp > start)
    }

    fn most_commented(&self, request: &RankRequest, candidates: &HashSet<i64>) -> Vec<RankedEntity> {
        let comments = self.comments.iter().filter(|c| {
            c.is_published() && Self::in_window(c.created, request.window_start)
        });

        if request.entity_type.is_group() {
            self.count_by_group(comments.map(|c| (c.entity_type, c.entity_id)), candidates)
        } else {
            let entity_type = request.entity_type;
            self.count_direct(
                request,
                comments
                    .filter(|c| c.entity_type == entity_type)
                    .map(|c| c.entity_id),
                candidates,
            )
        }
    }

    fn most_liked(&self, request: &RankRequest, candidates: &HashSet<i64>) -> Vec<RankedEntity> {
        let votes = self
            .votes
            .iter()
            .filter(|v| Self::in_window(v.timestamp, request.window_start));

        if request.entity_type.is_group() {
            self.count_by_group(votes.map(|v| (v.entity_type, v.entity_id)), candidates)
        } else {
            let entity_type = request.entity_type;
            self.count_direct(
                request,
                votes
                    .filter(|v| v.entity_type == entity_type)
                    .map(|v| v.entity_id),
                candidates,
            )
        }
    }

    fn newest_vote(&self, entity_type: EntityType, entity_id: i64) -> i64 {
        self.votes
            .iter()
            .filter(|v| v.targets(entity_type, entity_id))
            .map(|v| v.timestamp)
            .max()
            .unwrap_or(0)
    }

    /// Newest comment change and newest vote on those comments.
    fn newest_comment_signals(&self, entity_type: EntityType, entity_id: i64) -> (i64, i64) {
        self.comments
            .iter()
            .filter(|c| c.targets(entity_type, entity_id))
            .fold((0, 0), |(changed, voted), c| {
                (
                    changed.max(c.changed),
                    voted.max(self.newest_vote(EntityType::Comment, c.cid)),
                )
            })
    }

    fn last_interacted(&self, request: &RankRequest, candidates: &HashSet<i64>) -> Vec<RankedEntity> {
        let entity_type = request.entity_type;
        candidates
            .iter()
            .filter_map(|&id| self.entities.get(&(entity_type, id)))
            .filter(|record| record.is_published())
            .map(|record| {
                let (commented, comment_voted) = self.newest_comment_signals(entity_type, record.id);
                let score = record
                    .changed
                    .max(commented)
                    .max(comment_voted)
                    .max(self.newest_vote(entity_type, record.id));
                RankedEntity {
                    id: record.id,
                    score,
                }
            })
            .collect()
    }

    fn last_interacted_group(&self, candidates: &HashSet<i64>) -> Vec<RankedEntity> {
        let mut scores: HashMap<i64, i64> = HashMap::new();

        for gc in self.group_content.iter().filter(|gc| candidates.contains(&gc.gid)) {
            let (commented, comment_voted) = self.newest_comment_signals(gc.entity_type, gc.entity_id);
            let node_changed = if gc.entity_type == EntityType::Node {
                self.entities
                    .get(&(EntityType::Node, gc.entity_id))
                    .map_or(0, |node| node.changed)
            } else {
                0
            };

            let score = gc
                .changed
                .max(self.newest_vote(gc.entity_type, gc.entity_id))
                .max(commented)
                .max(comment_voted)
                .max(node_changed)
                .max(self.newest_post_signal(gc.gid));

            let entry = scores.entry(gc.gid).or_insert(0);
            *entry = (*entry).max(score);
        }

        scores
            .into_iter()
            .map(|(id, score)| RankedEntity { id, score })
            .collect()
    }

    /// Newest change, comment change, or vote on posts addressed to a group.
    fn newest_post_signal(&self, gid: i64) -> i64 {
        self.post_recipients
            .iter()
            .filter(|r| r.group_id == gid)
            .filter_map(|r| self.entities.get(&(EntityType::Post, r.post_id)))
            .map(|post| {
                let commented = self
                    .comments
                    .iter()
                    .filter(|c| c.targets(EntityType::Post, post.id))
                    .map(|c| c.changed)
                    .max()
                    .unwrap_or(0);
                post.changed
                    .max(commented)
                    .max(self.newest_vote(EntityType::Post, post.id))
            })
            .max()
            .unwrap_or(0)
    }
}

/// Compare a column value with a scalar filter value.
fn compare(column: &Value, value: &FilterValue) -> Option<Ordering> {
    match (column, value) {
        (Value::Number(n), FilterValue::Integer(i)) => n.as_i64().map(|c| c.cmp(i)),
        (Value::Number(n), FilterValue::Boolean(b)) => n.as_i64().map(|c| c.cmp(&i64::from(*b))),
        (Value::String(s), FilterValue::String(v)) => Some(s.as_str().cmp(v.as_str())),
        (Value::Bool(b), FilterValue::Boolean(v)) => Some(b.cmp(v)),
        _ => None,
    }
}

/// SQL comparison semantics: NULL columns match only IS NULL, and values
/// that do not fit the operator never match.
fn condition_matches(column: Option<Value>, filter: &QueryFilter) -> bool {
    match filter.operator {
        FilterOperator::IsNull => column.is_none(),
        FilterOperator::IsNotNull => column.is_some(),
        FilterOperator::In | FilterOperator::NotIn => {
            let values: Vec<&FilterValue> = filter
                .value
                .as_list()
                .into_iter()
                .filter(|v| !matches!(v, FilterValue::List(_)))
                .collect();
            if values.is_empty() {
                return filter.operator == FilterOperator::NotIn;
            }
            let Some(column) = column else {
                return false;
            };
            let found = values
                .iter()
                .any(|v| compare(&column, v) == Some(Ordering::Equal));
            (filter.operator == FilterOperator::In) == found
        }
        operator => {
            let Some(ordering) = column.and_then(|c| compare(&c, &filter.value)) else {
                return false;
            };
            match operator {
                FilterOperator::Equals => ordering == Ordering::Equal,
                FilterOperator::NotEquals => ordering != Ordering::Equal,
                FilterOperator::GreaterThan => ordering == Ordering::Greater,
                FilterOperator::LessThan => ordering == Ordering::Less,
                FilterOperator::GreaterOrEqual => ordering != Ordering::Less,
                FilterOperator::LessOrEqual => ordering != Ordering::Greater,
                _ => false,
            }
        }
    }
}

/// Ascending column order with NULLs last.
fn compare_columns(a: &Option<Value>, b: &Option<Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_i64()
            .zip(y.as_i64())
            .map_or(Ordering::Equal, |(x, y)| x.cmp(&y)),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn candidate_ids(&self, criteria: &SelectionCriteria) -> Result<Vec<i64>> {
        let data = self.data.read();
        Ok(data.matching(criteria).iter().map(|r| r.id).collect())
    }

    async fn select_ordered(
        &self,
        criteria: &SelectionCriteria,
        field: &str,
        limit: u64,
    ) -> Result<Vec<i64>> {
        let data = self.data.read();
        let mut rows: Vec<(Option<Value>, i64)> = data
            .matching(criteria)
            .iter()
            .map(|r| (r.column(field), r.id))
            .collect();
        rows.sort_by(|a, b| compare_columns(&a.0, &b.0).then(a.1.cmp(&b.1)));

        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(rows.into_iter().take(limit).map(|(_, id)| id).collect())
    }

    async fn rank(&self, request: &RankRequest) -> Result<Vec<RankedEntity>> {
        let data = self.data.read();
        let candidates: HashSet<i64> = request.candidates.iter().copied().collect();

        let mut ranked = match request.mode {
            RankingMode::MostCommented => data.most_commented(request, &candidates),
            RankingMode::MostLiked => data.most_liked(request, &candidates),
            RankingMode::LastInteracted if request.entity_type.is_group() => {
                data.last_interacted_group(&candidates)
            }
            RankingMode::LastInteracted => data.last_interacted(request, &candidates),
        };

        sort_ranked(&mut ranked);
        ranked.truncate(usize::try_from(request.limit).unwrap_or(usize::MAX));
        Ok(ranked)
    }

    async fn load_entities(
        &self,
        entity_type: EntityType,
        ids: &[i64],
    ) -> Result<Vec<EntityRecord>> {
        let data = self.data.read();
        Ok(ids
            .iter()
            .filter_map(|id| data.entities.get(&(entity_type, *id)).cloned())
            .collect())
    }

    async fn load_block(&self, id: i64) -> Result<Option<BlockContent>> {
        Ok(self.data.read().blocks.get(&id).cloned())
    }

    async fn count_authored(
        &self,
        uid: Uuid,
        entity_type: EntityType,
        bundle: &str,
    ) -> Result<i64> {
        let data = self.data.read();
        let count = data
            .entities
            .values()
            .filter(|r| r.entity_type == entity_type && r.bundle == bundle && r.uid == Some(uid))
            .count();
        Ok(i64::try_from(count)?)
    }
}
