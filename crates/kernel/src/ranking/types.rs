//! Ranked selection types.
//!
//! - SelectionCriteria: what to select (entity type, bundle, reference filters)
//! - SortMode: how to order it (base column or an interaction ranking)
//! - QueryFilter: extra column conditions added by alter callbacks

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::{EntityType, UnknownEntityType};

/// Trailing window, in days, for the count-based ranking modes.
pub const RANKING_WINDOW_DAYS: i64 = 90;

const SECONDS_PER_DAY: i64 = 86_400;

/// Errors raised while selecting ranked content.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("invalid sort field: {0}")]
    InvalidSortField(String),

    #[error("invalid condition field: {0}")]
    InvalidConditionField(String),

    #[error("{0} entities cannot be ranked by interactions")]
    UnrankableEntityType(EntityType),

    #[error(transparent)]
    UnknownEntityType(#[from] UnknownEntityType),

    #[error("content store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

/// Validate a column name: non-empty, ASCII alphanumeric/underscore,
/// starting with a letter or underscore, max 64 chars.
pub fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
}

/// Block sort option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortMode {
    /// Ascending by a column of the base table.
    Field(String),
    MostCommented,
    MostLiked,
    LastInteracted,
}

impl FromStr for SortMode {
    type Err = RankingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "most_commented" => Ok(Self::MostCommented),
            "most_liked" => Ok(Self::MostLiked),
            "last_interacted" => Ok(Self::LastInteracted),
            field if is_valid_identifier(field) => Ok(Self::Field(field.to_string())),
            other => Err(RankingError::InvalidSortField(other.to_string())),
        }
    }
}

impl TryFrom<String> for SortMode {
    type Error = RankingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortMode> for String {
    fn from(mode: SortMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => f.write_str(field),
            Self::MostCommented => f.write_str("most_commented"),
            Self::MostLiked => f.write_str("most_liked"),
            Self::LastInteracted => f.write_str("last_interacted"),
        }
    }
}

impl Default for SortMode {
    fn default() -> Self {
        Self::Field("changed".to_string())
    }
}

/// Interaction-based ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    /// Published comments per candidate.
    MostCommented,
    /// Votes per candidate.
    MostLiked,
    /// Newest timestamp across every interaction signal.
    LastInteracted,
}

impl RankingMode {
    /// Oldest timestamp (exclusive) an interaction may carry to be counted.
    ///
    /// The count modes look back [`RANKING_WINDOW_DAYS`]; last-interacted has
    /// no cutoff.
    pub fn window_start(&self, now: i64) -> Option<i64> {
        match self {
            Self::MostCommented | Self::MostLiked => {
                Some(now - RANKING_WINDOW_DAYS * SECONDS_PER_DAY)
            }
            Self::LastInteracted => None,
        }
    }
}

/// Where a reference filter looks for the referenced ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "field", rename_all = "snake_case")]
pub enum ReferenceSource {
    /// An entity reference field stored in `entity_reference`.
    Field(String),
    /// Group-content membership; the ids are group ids.
    GroupMembership,
}

/// "Entity references any of `target_ids` through `source`."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceFilter {
    pub source: ReferenceSource,
    pub target_ids: Vec<i64>,
}

/// Comparison operators for column conditions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    /// Value in list.
    In,
    /// Value not in list.
    NotIn,
    IsNull,
    IsNotNull,
}

/// Filter value types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FilterValue {
    Boolean(bool),
    Integer(i64),
    String(String),
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// JSON form, used to compare against in-memory columns.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Boolean(b) => Value::from(*b),
            Self::Integer(i) => Value::from(*i),
            Self::String(s) => Value::from(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }

    /// Members of a list value; a scalar is a list of one.
    pub fn as_list(&self) -> Vec<&FilterValue> {
        match self {
            Self::List(items) => items.iter().collect(),
            scalar => vec![scalar],
        }
    }
}

/// Condition on a base table column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryFilter {
    pub field: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

impl QueryFilter {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }
}

/// Everything the selector needs to produce a ranked id list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    pub entity_type: EntityType,

    /// Restrict to a bundle.
    #[serde(default)]
    pub bundle: Option<String>,

    /// Reference filters, combined with AND.
    #[serde(default)]
    pub references: Vec<ReferenceFilter>,

    /// Column conditions, combined with AND.
    #[serde(default)]
    pub conditions: Vec<QueryFilter>,

    #[serde(default)]
    pub sort: SortMode,

    /// Maximum number of ids returned.
    pub limit: u32,
}

impl SelectionCriteria {
    pub fn new(entity_type: EntityType, limit: u32) -> Self {
        Self {
            entity_type,
            bundle: None,
            references: Vec::new(),
            conditions: Vec::new(),
            sort: SortMode::default(),
            limit,
        }
    }

    pub fn bundle(mut self, bundle: impl Into<String>) -> Self {
        self.bundle = Some(bundle.into());
        self
    }

    pub fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Require a reference through `field` to any of `target_ids`.
    pub fn reference(mut self, field: impl Into<String>, target_ids: Vec<i64>) -> Self {
        self.add_reference(ReferenceSource::Field(field.into()), target_ids);
        self
    }

    /// Require membership in any of the groups.
    pub fn in_groups(mut self, group_ids: Vec<i64>) -> Self {
        self.add_reference(ReferenceSource::GroupMembership, group_ids);
        self
    }

    pub fn condition(mut self, filter: QueryFilter) -> Self {
        self.conditions.push(filter);
        self
    }

    pub fn add_reference(&mut self, source: ReferenceSource, target_ids: Vec<i64>) {
        self.references.push(ReferenceFilter { source, target_ids });
    }

    /// Check every column name that ends up in SQL.
    pub fn validate(&self) -> Result<(), RankingError> {
        if let SortMode::Field(ref field) = self.sort
            && !is_valid_identifier(field)
        {
            return Err(RankingError::InvalidSortField(field.clone()));
        }
        for filter in &self.conditions {
            if !is_valid_identifier(&filter.field) {
                return Err(RankingError::InvalidConditionField(filter.field.clone()));
            }
        }
        for reference in &self.references {
            if let ReferenceSource::Field(ref field) = reference.source
                && !is_valid_identifier(field)
            {
                return Err(RankingError::InvalidConditionField(field.clone()));
            }
        }
        Ok(())
    }
}

/// A ranking query over an already-filtered candidate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankRequest {
    pub entity_type: EntityType,
    pub mode: RankingMode,
    /// Candidate ids; the ranking never looks outside this set.
    pub candidates: Vec<i64>,
    /// Exclusive lower bound on interaction timestamps.
    pub window_start: Option<i64>,
    pub limit: u64,
}

/// One ranked entity and the score it was ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RankedEntity {
    pub id: i64,
    pub score: i64,
}

/// Order by score descending, then id ascending.
pub(crate) fn sort_ranked(ranked: &mut [RankedEntity]) {
    ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
}
