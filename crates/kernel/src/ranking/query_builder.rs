//! Ranking query builder using SeaQuery.
//!
//! Generates the two query shapes the selector runs:
//! - the base query: candidate ids of one entity type, filtered by bundle,
//!   reference filters, and column conditions
//! - the ranking queries: aggregate comments, votes, or interaction
//!   timestamps over an explicit candidate id list

use sea_query::{
    Alias, Cond, Expr, JoinType, Order, PostgresQueryBuilder, Query, SelectStatement,
    SimpleExpr, Value,
};

use super::types::{
    FilterOperator, FilterValue, QueryFilter, RankRequest, RankingMode, ReferenceFilter,
    ReferenceSource, SelectionCriteria,
};
use crate::models::EntityType;

/// Alias of the entity data table in every query.
const BASE: &str = "base_table";

/// Group id of an interaction reached either through group content or
/// through a post addressed to the group.
const GROUP_OF_INTERACTION: &str = "COALESCE(gfd.gid, pfrg.field_recipient_group_target_id)";

const NEWEST_NON_GROUP: &str = "GREATEST(COALESCE(MAX(vv.timestamp), 0), \
     COALESCE(MAX(vvn.timestamp), 0), \
     COALESCE(MAX(cfd.changed), 0), \
     COALESCE(MAX(base_table.changed), 0))";

const NEWEST_GROUP: &str = "GREATEST(COALESCE(MAX(gfd.changed), 0), \
     COALESCE(MAX(vv.timestamp), 0), \
     COALESCE(MAX(cfd.changed), 0), \
     COALESCE(MAX(nfd.changed), 0), \
     COALESCE(MAX(pfd.changed), 0), \
     COALESCE(MAX(cfdp.changed), 0), \
     COALESCE(MAX(vvp.timestamp), 0), \
     COALESCE(MAX(vvn.timestamp), 0))";

fn col(table: &str, column: &str) -> Expr {
    Expr::col((Alias::new(table), Alias::new(column)))
}

fn col_ref(table: &str, column: &str) -> (Alias, Alias) {
    (Alias::new(table), Alias::new(column))
}

/// Query builder for ranked selection.
pub struct RankingQueryBuilder<'a> {
    criteria: &'a SelectionCriteria,
}

impl<'a> RankingQueryBuilder<'a> {
    pub fn new(criteria: &'a SelectionCriteria) -> Self {
        Self { criteria }
    }

    /// Build the candidate id query (unbounded, id order).
    pub fn build_candidates(&self) -> String {
        let id_key = self.criteria.entity_type.id_key();
        let mut query = self.base_select();
        query.order_by(col_ref(BASE, id_key), Order::Asc);
        query.to_string(PostgresQueryBuilder)
    }

    /// Build the base query ordered by a base table column, ascending.
    pub fn build_ordered(&self, field: &str, limit: u64) -> String {
        let id_key = self.criteria.entity_type.id_key();
        let mut query = self.base_select();
        query
            .order_by(col_ref(BASE, field), Order::Asc)
            .order_by(col_ref(BASE, id_key), Order::Asc)
            .limit(limit);
        query.to_string(PostgresQueryBuilder)
    }

    /// SELECT <id> FROM <data table> AS base_table WHERE ...
    fn base_select(&self) -> SelectStatement {
        let entity_type = self.criteria.entity_type;
        let mut query = Query::select();
        query
            .column(col_ref(BASE, entity_type.id_key()))
            .from_as(Alias::new(entity_type.data_table()), Alias::new(BASE));

        if let Some(ref bundle) = self.criteria.bundle {
            query.and_where(col(BASE, entity_type.bundle_key()).eq(bundle.as_str()));
        }

        for reference in &self.criteria.references {
            query.and_where(reference_condition(entity_type, reference));
        }

        for filter in &self.criteria.conditions {
            query.and_where(filter_condition(filter));
        }

        query
    }

    /// Build the ranking query for a candidate set.
    pub fn build_rank(request: &RankRequest) -> String {
        let mut query = match (request.mode, request.entity_type.is_group()) {
            (RankingMode::MostCommented, true) => most_commented_group(request),
            (RankingMode::MostCommented, false) => most_commented(request),
            (RankingMode::MostLiked, true) => most_liked_group(request),
            (RankingMode::MostLiked, false) => most_liked(request),
            (RankingMode::LastInteracted, true) => last_interacted_group(request),
            (RankingMode::LastInteracted, false) => last_interacted(request),
        };

        query
            .order_by(Alias::new("score"), Order::Desc)
            .order_by(Alias::new("id"), Order::Asc)
            .limit(request.limit);

        query.to_string(PostgresQueryBuilder)
    }
}

/// EXISTS subquery matching any of the reference targets.
fn reference_condition(entity_type: EntityType, reference: &ReferenceFilter) -> SimpleExpr {
    if reference.target_ids.is_empty() {
        return Expr::cust("FALSE");
    }
    let targets = reference.target_ids.iter().copied();
    let base_id = col_ref(BASE, entity_type.id_key());

    let subquery = match &reference.source {
        ReferenceSource::Field(field) => Query::select()
            .expr(Expr::val(1))
            .from_as(Alias::new("entity_reference"), Alias::new("er"))
            .and_where(col("er", "entity_type").eq(entity_type.as_str()))
            .and_where(col("er", "entity_id").equals(base_id))
            .and_where(col("er", "field_name").eq(field.as_str()))
            .and_where(col("er", "target_id").is_in(targets))
            .to_owned(),
        ReferenceSource::GroupMembership => Query::select()
            .expr(Expr::val(1))
            .from_as(Alias::new("group_content_field_data"), Alias::new("gc"))
            .and_where(col("gc", "entity_type").eq(entity_type.as_str()))
            .and_where(col("gc", "entity_id").equals(base_id))
            .and_where(col("gc", "gid").is_in(targets))
            .to_owned(),
    };

    Expr::exists(subquery)
}

fn sea_value(value: &FilterValue) -> Option<Value> {
    match value {
        FilterValue::Boolean(b) => Some((*b).into()),
        FilterValue::Integer(i) => Some((*i).into()),
        FilterValue::String(s) => Some(s.clone().into()),
        FilterValue::List(_) => None,
    }
}

/// Build a single column condition.
///
/// Conditions that cannot be expressed (a list compared with `=`, an empty
/// `IN`) become FALSE so they restrict rather than widen results.
fn filter_condition(filter: &QueryFilter) -> SimpleExpr {
    let field = col(BASE, &filter.field);
    let scalar = || sea_value(&filter.value);

    let condition = match filter.operator {
        FilterOperator::Equals => scalar().map(|v| field.eq(v)),
        FilterOperator::NotEquals => scalar().map(|v| field.ne(v)),
        FilterOperator::GreaterThan => scalar().map(|v| field.gt(v)),
        FilterOperator::LessThan => scalar().map(|v| field.lt(v)),
        FilterOperator::GreaterOrEqual => scalar().map(|v| field.gte(v)),
        FilterOperator::LessOrEqual => scalar().map(|v| field.lte(v)),
        FilterOperator::In | FilterOperator::NotIn => {
            let values: Vec<Value> = filter
                .value
                .as_list()
                .into_iter()
                .filter_map(sea_value)
                .collect();
            match (filter.operator, values.is_empty()) {
                (FilterOperator::In, true) => None,
                (FilterOperator::NotIn, true) => Some(Expr::cust("TRUE")),
                (FilterOperator::In, false) => Some(field.is_in(values)),
                _ => Some(field.is_not_in(values)),
            }
        }
        FilterOperator::IsNull => Some(field.is_null()),
        FilterOperator::IsNotNull => Some(field.is_not_null()),
    };

    condition.unwrap_or_else(|| {
        tracing::warn!(
            field = %filter.field,
            operator = ?filter.operator,
            "condition value does not fit operator; restricting results"
        );
        Expr::cust("FALSE")
    })
}

/// Published comments per group, reached through group content or posts.
fn most_commented_group(request: &RankRequest) -> SelectStatement {
    let mut query = Query::select();
    query
        .expr_as(Expr::cust(GROUP_OF_INTERACTION), Alias::new("id"))
        .expr_as(Expr::cust("COUNT(cfd.cid)"), Alias::new("score"))
        .from_as(Alias::new("comment_field_data"), Alias::new("cfd"))
        .join_as(
            JoinType::LeftJoin,
            Alias::new("post__field_recipient_group"),
            Alias::new("pfrg"),
            Cond::all()
                .add(col("cfd", "entity_type").eq(EntityType::Post.as_str()))
                .add(col("cfd", "entity_id").equals(col_ref("pfrg", "entity_id"))),
        )
        .join_as(
            JoinType::LeftJoin,
            Alias::new("group_content_field_data"),
            Alias::new("gfd"),
            Cond::all()
                .add(col("gfd", "entity_type").equals(col_ref("cfd", "entity_type")))
                .add(col("cfd", "entity_id").equals(col_ref("gfd", "entity_id"))),
        )
        .and_where(col("cfd", "status").eq(1))
        .and_where(Expr::expr(Expr::cust(GROUP_OF_INTERACTION)).is_in(request.candidates.iter().copied()))
        .add_group_by([Expr::cust(GROUP_OF_INTERACTION)]);

    if let Some(start) = request.window_start {
        query.and_where(col("cfd", "created").gt(start));
    }
    query
}

/// Published comments per candidate of a non-group type.
fn most_commented(request: &RankRequest) -> SelectStatement {
    let entity_type = request.entity_type;
    let id_key = entity_type.id_key();

    let mut query = Query::select();
    query
        .expr_as(col(BASE, id_key), Alias::new("id"))
        .expr_as(Expr::cust("COUNT(cfd.cid)"), Alias::new("score"))
        .from_as(Alias::new("comment_field_data"), Alias::new("cfd"))
        .join_as(
            JoinType::InnerJoin,
            Alias::new(entity_type.data_table()),
            Alias::new(BASE),
            col(BASE, id_key).equals(col_ref("cfd", "entity_id")),
        )
        .and_where(col("cfd", "entity_type").eq(entity_type.as_str()))
        .and_where(col("cfd", "entity_id").is_in(request.candidates.iter().copied()))
        .and_where(col("cfd", "status").eq(1))
        .group_by_col(col_ref(BASE, id_key));

    if let Some(start) = request.window_start {
        query.and_where(col("cfd", "created").gt(start));
    }
    query
}

/// Votes per group, reached through group content or posts.
fn most_liked_group(request: &RankRequest) -> SelectStatement {
    let mut query = Query::select();
    query
        .expr_as(Expr::cust(GROUP_OF_INTERACTION), Alias::new("id"))
        .expr_as(Expr::cust("COUNT(vv.id)"), Alias::new("score"))
        .from_as(Alias::new("votingapi_vote"), Alias::new("vv"))
        .join_as(
            JoinType::LeftJoin,
            Alias::new("post__field_recipient_group"),
            Alias::new("pfrg"),
            Cond::all()
                .add(col("vv", "entity_type").eq(EntityType::Post.as_str()))
                .add(col("vv", "entity_id").equals(col_ref("pfrg", "entity_id"))),
        )
        .join_as(
            JoinType::LeftJoin,
            Alias::new("group_content_field_data"),
            Alias::new("gfd"),
            Cond::all()
                .add(col("gfd", "entity_type").equals(col_ref("vv", "entity_type")))
                .add(col("vv", "entity_id").equals(col_ref("gfd", "entity_id"))),
        )
        .and_where(Expr::expr(Expr::cust(GROUP_OF_INTERACTION)).is_in(request.candidates.iter().copied()))
        .add_group_by([Expr::cust(GROUP_OF_INTERACTION)]);

    if let Some(start) = request.window_start {
        query.and_where(col("vv", "timestamp").gt(start));
    }
    query
}

/// Votes per candidate of a non-group type.
fn most_liked(request: &RankRequest) -> SelectStatement {
    let entity_type = request.entity_type;
    let id_key = entity_type.id_key();

    let mut query = Query::select();
    query
        .expr_as(col(BASE, id_key), Alias::new("id"))
        .expr_as(Expr::cust("COUNT(vv.id)"), Alias::new("score"))
        .from_as(Alias::new("votingapi_vote"), Alias::new("vv"))
        .join_as(
            JoinType::InnerJoin,
            Alias::new(entity_type.data_table()),
            Alias::new(BASE),
            col(BASE, id_key).equals(col_ref("vv", "entity_id")),
        )
        .and_where(col("vv", "entity_type").eq(entity_type.as_str()))
        .and_where(col("vv", "entity_id").is_in(request.candidates.iter().copied()))
        .group_by_col(col_ref(BASE, id_key));

    if let Some(start) = request.window_start {
        query.and_where(col("vv", "timestamp").gt(start));
    }
    query
}

/// Newest interaction per published candidate, all time.
fn last_interacted(request: &RankRequest) -> SelectStatement {
    let entity_type = request.entity_type;
    let id_key = entity_type.id_key();

    let mut query = Query::select();
    query
        .expr_as(col(BASE, id_key), Alias::new("id"))
        .expr_as(Expr::cust(NEWEST_NON_GROUP), Alias::new("score"))
        .from_as(Alias::new(entity_type.data_table()), Alias::new(BASE))
        // Comments on the entity.
        .join_as(
            JoinType::LeftJoin,
            Alias::new("comment_field_data"),
            Alias::new("cfd"),
            Cond::all()
                .add(col("cfd", "entity_type").eq(entity_type.as_str()))
                .add(col(BASE, id_key).equals(col_ref("cfd", "entity_id"))),
        )
        // Likes on the entity.
        .join_as(
            JoinType::LeftJoin,
            Alias::new("votingapi_vote"),
            Alias::new("vv"),
            Cond::all()
                .add(col("vv", "entity_type").eq(entity_type.as_str()))
                .add(col(BASE, id_key).equals(col_ref("vv", "entity_id"))),
        )
        // Likes on its comments.
        .join_as(
            JoinType::LeftJoin,
            Alias::new("votingapi_vote"),
            Alias::new("vvn"),
            Cond::all()
                .add(col("vvn", "entity_type").eq(EntityType::Comment.as_str()))
                .add(col("cfd", "cid").equals(col_ref("vvn", "entity_id"))),
        )
        .and_where(col(BASE, id_key).is_in(request.candidates.iter().copied()))
        .and_where(col(BASE, "status").eq(1))
        .group_by_col(col_ref(BASE, id_key));
    query
}

/// Newest interaction per group, all time, including posts addressed to it.
fn last_interacted_group(request: &RankRequest) -> SelectStatement {
    let mut query = Query::select();
    query
        .expr_as(col("gfd", "gid"), Alias::new("id"))
        .expr_as(Expr::cust(NEWEST_GROUP), Alias::new("score"))
        .from_as(Alias::new("group_content_field_data"), Alias::new("gfd"))
        .join_as(
            JoinType::LeftJoin,
            Alias::new("votingapi_vote"),
            Alias::new("vv"),
            Cond::all()
                .add(col("vv", "entity_type").equals(col_ref("gfd", "entity_type")))
                .add(col("gfd", "entity_id").equals(col_ref("vv", "entity_id"))),
        )
        .join_as(
            JoinType::LeftJoin,
            Alias::new("comment_field_data"),
            Alias::new("cfd"),
            Cond::all()
                .add(col("cfd", "entity_type").equals(col_ref("gfd", "entity_type")))
                .add(col("gfd", "entity_id").equals(col_ref("cfd", "entity_id"))),
        )
        .join_as(
            JoinType::LeftJoin,
            Alias::new("node_field_data"),
            Alias::new("nfd"),
            Cond::all()
                .add(col("gfd", "entity_type").eq(EntityType::Node.as_str()))
                .add(col("gfd", "entity_id").equals(col_ref("nfd", "nid"))),
        )
        // Posts addressed to the group.
        .join_as(
            JoinType::LeftJoin,
            Alias::new("post__field_recipient_group"),
            Alias::new("pst"),
            col("gfd", "gid").equals(col_ref("pst", "field_recipient_group_target_id")),
        )
        .join_as(
            JoinType::LeftJoin,
            Alias::new("post_field_data"),
            Alias::new("pfd"),
            col("pst", "entity_id").equals(col_ref("pfd", "id")),
        )
        // Comments on those posts.
        .join_as(
            JoinType::LeftJoin,
            Alias::new("comment_field_data"),
            Alias::new("cfdp"),
            Cond::all()
                .add(col("cfdp", "entity_type").eq(EntityType::Post.as_str()))
                .add(col("pfd", "id").equals(col_ref("cfdp", "entity_id"))),
        )
        // Likes on those posts.
        .join_as(
            JoinType::LeftJoin,
            Alias::new("votingapi_vote"),
            Alias::new("vvp"),
            Cond::all()
                .add(col("vvp", "entity_type").eq(EntityType::Post.as_str()))
                .add(col("pfd", "id").equals(col_ref("vvp", "entity_id"))),
        )
        // Likes on comments of the group content.
        .join_as(
            JoinType::LeftJoin,
            Alias::new("votingapi_vote"),
            Alias::new("vvn"),
            Cond::all()
                .add(col("vvn", "entity_type").eq(EntityType::Comment.as_str()))
                .add(col("cfd", "cid").equals(col_ref("vvn", "entity_id"))),
        )
        .and_where(col("gfd", "gid").is_in(request.candidates.iter().copied()))
        .group_by_col(col_ref("gfd", "gid"));
    query
}
