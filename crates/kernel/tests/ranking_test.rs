//! Ranked selection over the in-memory content store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use commons_kernel::models::EntityType;
use commons_kernel::ranking::{MemoryContentStore, RankedSelector, SelectionCriteria, SortMode};
use commons_test_utils::time::{NOW, days_ago, seconds_ago};

use common::{comment, group, group_content, node, post, recipient, reference, vote};

fn selector(store: &Arc<MemoryContentStore>) -> RankedSelector {
    RankedSelector::new(store.clone())
}

fn topics(limit: u32, sort: SortMode) -> SelectionCriteria {
    SelectionCriteria::new(EntityType::Node, limit)
        .bundle("topic")
        .sort(sort)
}

/// Six topics with vote counts 10, 3, 7, 0, 9, 2.
fn voted_topics() -> Arc<MemoryContentStore> {
    let store = Arc::new(MemoryContentStore::new());
    let mut vote_id = 0;
    for (nid, votes) in (1_i64..).zip([10, 3, 7, 0, 9, 2]) {
        store.insert_entity(node(nid, "topic", days_ago(1)));
        for _ in 0..votes {
            vote_id += 1;
            store.insert_vote(vote(vote_id, EntityType::Node, nid, days_ago(2)));
        }
    }
    store
}

#[tokio::test]
async fn most_liked_orders_by_vote_count() {
    let store = voted_topics();
    let ids = selector(&store)
        .select_at(&topics(5, SortMode::MostLiked), NOW)
        .await
        .unwrap();

    assert_eq!(ids, vec![1, 5, 3, 2, 6]);
}

#[tokio::test]
async fn result_never_exceeds_limit() {
    let store = voted_topics();
    let ids = selector(&store)
        .select_at(&topics(2, SortMode::MostLiked), NOW)
        .await
        .unwrap();

    assert_eq!(ids, vec![1, 5]);
}

#[tokio::test]
async fn count_window_excludes_its_boundary() {
    let store = Arc::new(MemoryContentStore::new());
    store.insert_entity(node(1, "topic", days_ago(1)));
    store.insert_entity(node(2, "topic", days_ago(1)));

    // Node 1: two comments exactly on the cutoff, not counted.
    store.insert_comment(comment(1, EntityType::Node, 1, days_ago(90)));
    store.insert_comment(comment(2, EntityType::Node, 1, days_ago(90)));
    // Node 2: one comment a second inside the window.
    store.insert_comment(comment(3, EntityType::Node, 2, days_ago(90) + 1));

    let ids = selector(&store)
        .select_at(&topics(5, SortMode::MostCommented), NOW)
        .await
        .unwrap();

    assert_eq!(ids, vec![2]);
}

#[tokio::test]
async fn most_commented_ignores_unpublished_comments() {
    let store = Arc::new(MemoryContentStore::new());
    store.insert_entity(node(1, "topic", days_ago(1)));
    store.insert_entity(node(2, "topic", days_ago(1)));

    for cid in 1..=3 {
        let mut hidden = comment(cid, EntityType::Node, 1, days_ago(3));
        hidden.status = 0;
        store.insert_comment(hidden);
    }
    store.insert_comment(comment(4, EntityType::Node, 2, days_ago(3)));

    let ids = selector(&store)
        .select_at(&topics(5, SortMode::MostCommented), NOW)
        .await
        .unwrap();

    assert_eq!(ids, vec![2]);
}

#[tokio::test]
async fn last_interacted_has_no_cutoff() {
    let store = Arc::new(MemoryContentStore::new());
    store.insert_entity(node(1, "topic", days_ago(200)));
    store.insert_entity(node(2, "topic", days_ago(150)));
    // A comment far outside the count window still counts as a signal.
    store.insert_comment(comment(1, EntityType::Node, 1, days_ago(100)));

    let ids = selector(&store)
        .select_at(&topics(5, SortMode::LastInteracted), NOW)
        .await
        .unwrap();

    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn last_interacted_counts_votes_on_comments() {
    let store = Arc::new(MemoryContentStore::new());
    store.insert_entity(node(1, "topic", days_ago(10)));
    store.insert_entity(node(2, "topic", days_ago(5)));
    store.insert_comment(comment(7, EntityType::Node, 1, days_ago(9)));
    store.insert_vote(vote(1, EntityType::Comment, 7, seconds_ago(60)));

    let ids = selector(&store)
        .select_at(&topics(5, SortMode::LastInteracted), NOW)
        .await
        .unwrap();

    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn ranking_stays_inside_the_candidate_set() {
    let store = voted_topics();
    // Only nodes 2 and 6 carry the tag; node 1 has the most votes overall.
    store.insert_reference(reference(2, "field_content_tags", 40));
    store.insert_reference(reference(6, "field_content_tags", 40));

    let criteria = topics(5, SortMode::MostLiked).reference("field_content_tags", vec![40]);
    let ids = selector(&store).select_at(&criteria, NOW).await.unwrap();

    assert_eq!(ids, vec![2, 6]);
}

#[tokio::test]
async fn empty_candidate_set_yields_nothing() {
    let store = voted_topics();
    let criteria = topics(5, SortMode::MostLiked).reference("field_content_tags", vec![999]);

    let ids = selector(&store).select_at(&criteria, NOW).await.unwrap();
    assert!(ids.is_empty());
}

#[tokio::test]
async fn groups_rank_by_comments_on_their_content_and_posts() {
    let store = Arc::new(MemoryContentStore::new());
    store.insert_entity(group(10, days_ago(30)));
    store.insert_entity(group(11, days_ago(30)));
    store.insert_entity(group(12, days_ago(30)));

    // Group 10: a topic with two comments.
    store.insert_entity(node(100, "topic", days_ago(20)));
    store.insert_group_content(group_content(1, 10, EntityType::Node, 100, days_ago(20)));
    store.insert_comment(comment(1, EntityType::Node, 100, days_ago(4)));
    store.insert_comment(comment(2, EntityType::Node, 100, days_ago(4)));

    // Group 11: a post addressed to it with three comments.
    store.insert_entity(post(200, days_ago(20)));
    store.insert_post_recipient(recipient(200, 11));
    for cid in 3..=5 {
        store.insert_comment(comment(cid, EntityType::Post, 200, days_ago(2)));
    }

    let criteria = SelectionCriteria::new(EntityType::Group, 5).sort(SortMode::MostCommented);
    let ids = selector(&store).select_at(&criteria, NOW).await.unwrap();

    assert_eq!(ids, vec![11, 10]);
}

#[tokio::test]
async fn groups_rank_by_latest_activity() {
    let store = Arc::new(MemoryContentStore::new());
    store.insert_entity(group(10, days_ago(30)));
    store.insert_entity(group(11, days_ago(30)));

    store.insert_entity(node(100, "event", days_ago(20)));
    store.insert_group_content(group_content(1, 10, EntityType::Node, 100, days_ago(20)));
    store.insert_entity(node(101, "topic", days_ago(25)));
    store.insert_group_content(group_content(2, 11, EntityType::Node, 101, days_ago(25)));
    store.insert_vote(vote(1, EntityType::Node, 101, days_ago(1)));

    let criteria = SelectionCriteria::new(EntityType::Group, 5).sort(SortMode::LastInteracted);
    let ids = selector(&store).select_at(&criteria, NOW).await.unwrap();

    assert_eq!(ids, vec![11, 10]);
}

#[tokio::test]
async fn field_sort_is_ascending_with_id_ties() {
    let store = Arc::new(MemoryContentStore::new());
    store.insert_entity(node(3, "topic", days_ago(5)));
    store.insert_entity(node(1, "topic", days_ago(2)));
    store.insert_entity(node(2, "topic", days_ago(5)));

    let ids = selector(&store)
        .select_at(&topics(5, SortMode::default()), NOW)
        .await
        .unwrap();

    assert_eq!(ids, vec![2, 3, 1]);
}

#[tokio::test]
async fn groups_rank_by_votes_on_their_content_and_posts() {
    let store = Arc::new(MemoryContentStore::new());
    for gid in [10, 11, 12] {
        store.insert_entity(group(gid, days_ago(30)));
    }

    // Group 10: a topic with two votes.
    store.insert_entity(node(100, "topic", days_ago(20)));
    store.insert_group_content(group_content(1, 10, EntityType::Node, 100, days_ago(20)));
    store.insert_vote(vote(1, EntityType::Node, 100, days_ago(5)));
    store.insert_vote(vote(2, EntityType::Node, 100, days_ago(5)));

    // Group 11: a post addressed to it with three recent votes and two old ones.
    store.insert_entity(post(200, days_ago(20)));
    store.insert_post_recipient(recipient(200, 11));
    for id in 3..=5 {
        store.insert_vote(vote(id, EntityType::Post, 200, days_ago(1)));
    }
    store.insert_vote(vote(6, EntityType::Post, 200, days_ago(120)));
    store.insert_vote(vote(7, EntityType::Post, 200, days_ago(91)));

    let criteria = SelectionCriteria::new(EntityType::Group, 5).sort(SortMode::MostLiked);
    let ids = selector(&store).select_at(&criteria, NOW).await.unwrap();

    assert_eq!(ids, vec![11, 10]);
}

#[tokio::test]
async fn group_activity_includes_posts_addressed_to_the_group() {
    let store = Arc::new(MemoryContentStore::new());
    for (gid, nid) in [(10, 100), (11, 101), (12, 102)] {
        store.insert_entity(group(gid, days_ago(60)));
        store.insert_entity(node(nid, "topic", days_ago(20)));
        store.insert_group_content(group_content(gid, gid, EntityType::Node, nid, days_ago(20)));
    }

    // Group 11: an old post with a recent comment.
    store.insert_entity(post(200, days_ago(40)));
    store.insert_post_recipient(recipient(200, 11));
    store.insert_comment(comment(1, EntityType::Post, 200, days_ago(3)));

    // Group 12: an old post with a newer vote.
    store.insert_entity(post(201, days_ago(40)));
    store.insert_post_recipient(recipient(201, 12));
    store.insert_vote(vote(1, EntityType::Post, 201, days_ago(1)));

    let criteria = SelectionCriteria::new(EntityType::Group, 5).sort(SortMode::LastInteracted);
    let ids = selector(&store).select_at(&criteria, NOW).await.unwrap();

    assert_eq!(ids, vec![12, 11, 10]);
}
