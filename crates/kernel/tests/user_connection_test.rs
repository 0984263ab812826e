//! Cursor-paginated user listing.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use commons_kernel::models::User;
use commons_kernel::pagination::{Connection, PaginationArgs, PaginationError};
use commons_kernel::user_query::{MemoryUserStore, QueryUser};
use commons_test_utils::time::days_ago;
use commons_test_utils::{anonymous_user, test_user};
use uuid::Uuid;

use common::user;

/// Five accounts plus the anonymous one.
fn people() -> QueryUser {
    let store = Arc::new(MemoryUserStore::new());
    store.insert(user(anonymous_user()));
    let accounts = [
        test_user("ada").named("Ada", "Lovelace").created_at(days_ago(5)),
        test_user("bob").named("bob", "Builder").created_at(days_ago(4)),
        test_user("cleo").named("Cleo", "Patra").created_at(days_ago(3)),
        test_user("nameless").created_at(days_ago(2)),
        test_user("dan").named("Dan", "Brown").created_at(days_ago(4)),
    ];
    for (n, account) in (1_u128..).zip(accounts) {
        store.insert(user(account.with_id(Uuid::from_u128(n))));
    }
    QueryUser::new(store)
}

fn names(connection: &Connection<User>) -> Vec<&str> {
    connection.nodes().map(|u| u.name.as_str()).collect()
}

async fn all_pages(query: &QueryUser, sort_key: &str, page_size: i64, reverse: bool) -> Vec<String> {
    let mut seen = Vec::new();
    let mut after: Option<String> = None;
    loop {
        let mut args = PaginationArgs::first(page_size);
        args.after = after.clone();
        args.reverse = reverse;
        let page = query.resolve(&args, sort_key).await.unwrap();
        seen.extend(page.nodes().map(|u| u.name.clone()));
        if !page.page_info.has_next_page {
            return seen;
        }
        after = page.page_info.end_cursor.clone();
    }
}

#[tokio::test]
async fn created_order_breaks_ties_by_id() {
    let query = people();
    let page = query.resolve(&PaginationArgs::first(10), "CREATED_AT").await.unwrap();

    // bob and dan share a creation time; bob has the lower id.
    assert_eq!(names(&page), vec!["ada", "bob", "dan", "cleo", "nameless"]);
    assert!(!page.page_info.has_next_page);
    assert!(!page.page_info.has_previous_page);
}

#[tokio::test]
async fn names_sort_bytewise_with_missing_names_first() {
    let query = people();
    let page = query.resolve(&PaginationArgs::first(10), "FIRST_NAME").await.unwrap();

    assert_eq!(names(&page), vec!["nameless", "ada", "cleo", "dan", "bob"]);
}

#[tokio::test]
async fn anonymous_user_never_appears() {
    let query = people();
    for key in ["CREATED_AT", "FIRST_NAME", "LAST_NAME"] {
        let page = query.resolve(&PaginationArgs::first(100), key).await.unwrap();
        assert_eq!(page.edges.len(), 5, "{key}");
        assert!(page.nodes().all(|u| !u.is_anonymous()), "{key}");
    }
}

#[tokio::test]
async fn paging_is_stable_and_complete() {
    let query = people();

    let first = query.resolve(&PaginationArgs::first(2), "LAST_NAME").await.unwrap();
    let again = query.resolve(&PaginationArgs::first(2), "LAST_NAME").await.unwrap();
    assert_eq!(names(&first), names(&again));
    assert_eq!(first.page_info.end_cursor, again.page_info.end_cursor);
    assert!(first.page_info.has_next_page);

    let paged = all_pages(&query, "LAST_NAME", 2, false).await;
    let whole = query.resolve(&PaginationArgs::first(100), "LAST_NAME").await.unwrap();
    assert_eq!(paged, names(&whole));
}

#[tokio::test]
async fn reverse_is_the_exact_reverse() {
    let query = people();
    for key in ["CREATED_AT", "FIRST_NAME", "LAST_NAME"] {
        let forward = all_pages(&query, key, 2, false).await;
        let mut reversed = all_pages(&query, key, 2, true).await;
        reversed.reverse();
        assert_eq!(forward, reversed, "{key}");
    }
}

#[tokio::test]
async fn backward_pages_keep_display_order() {
    let query = people();

    let tail = query.resolve(&PaginationArgs::last(2), "CREATED_AT").await.unwrap();
    assert_eq!(names(&tail), vec!["cleo", "nameless"]);
    assert!(tail.page_info.has_previous_page);
    assert!(!tail.page_info.has_next_page);

    let before = tail.page_info.start_cursor.clone().unwrap();
    let middle = query
        .resolve(&PaginationArgs::last(2).before(before), "CREATED_AT")
        .await
        .unwrap();
    assert_eq!(names(&middle), vec!["bob", "dan"]);
    assert!(middle.page_info.has_next_page);
    assert!(middle.page_info.has_previous_page);
}

#[tokio::test]
async fn unsupported_sort_key_is_rejected_first() {
    let query = people();
    // The arguments are invalid too; the sort key error wins.
    let err = query
        .resolve(&PaginationArgs::default(), "EMAIL")
        .await
        .unwrap_err();

    match err {
        PaginationError::InvalidArgument(message) => {
            assert_eq!(message, "Unsupported sortKey for sorting 'EMAIL'");
        }
        other => panic!("expected an argument error, got {other:?}"),
    }
}

#[tokio::test]
async fn garbage_cursor_is_an_argument_error() {
    let query = people();
    let err = query
        .resolve(&PaginationArgs::first(2).after("not a cursor"), "CREATED_AT")
        .await
        .unwrap_err();

    assert!(matches!(err, PaginationError::InvalidArgument(_)));
}

#[tokio::test]
async fn cursor_from_another_sort_key_is_rejected() {
    let query = people();
    let created = query.resolve(&PaginationArgs::first(1), "CREATED_AT").await.unwrap();
    let cursor = created.page_info.end_cursor.clone().unwrap();

    let err = query
        .resolve(&PaginationArgs::first(5).after(&cursor), "FIRST_NAME")
        .await
        .unwrap_err();
    match err {
        PaginationError::InvalidArgument(message) => {
            assert_eq!(message, "Invalid cursor for sortKey 'FIRST_NAME'");
        }
        other => panic!("expected an argument error, got {other:?}"),
    }

    let by_name = query.resolve(&PaginationArgs::first(1), "LAST_NAME").await.unwrap();
    let cursor = by_name.page_info.end_cursor.clone().unwrap();
    let err = query
        .resolve(&PaginationArgs::first(5).after(&cursor), "CREATED_AT")
        .await
        .unwrap_err();
    assert!(matches!(err, PaginationError::InvalidArgument(_)));
}
