#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Tests run the real kernel code on the in-memory stores: the same
//! selector, builders, and router the binary serves, without a database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use commons_kernel::content_block::{
    ContentBlockManager, ContentBuilder, QueryAlterRegistry, TeaserViewBuilder,
};
use commons_kernel::models::{
    BlockContent, BlockSettings, CONTENT_LIST_BUNDLE, Comment, EntityRecord, EntityReference,
    EntityType, GroupContent, PostRecipient, User, Vote,
};
use commons_kernel::ranking::{ContentStore, MemoryContentStore};
use commons_kernel::routes;
use commons_kernel::services::locale::LocaleService;
use commons_kernel::user_query::{MemoryUserStore, UserStore};
use commons_kernel::{AppState, StateOptions};
use commons_test_utils::{TestContentList, TestUser};

/// Convert a user fixture into a kernel user.
pub fn user(fixture: TestUser) -> User {
    User {
        id: fixture.id,
        name: fixture.name,
        mail: fixture.mail,
        status: fixture.status,
        created: fixture.created,
        first_name: fixture.first_name,
        last_name: fixture.last_name,
    }
}

/// Published node changed at `changed`.
pub fn node(id: i64, bundle: &str, changed: i64) -> EntityRecord {
    let mut record = EntityRecord::new(EntityType::Node, id, bundle);
    record.title = format!("Node {id}");
    record.created = changed;
    record.changed = changed;
    record
}

/// Published group changed at `changed`.
pub fn group(id: i64, changed: i64) -> EntityRecord {
    let mut record = EntityRecord::new(EntityType::Group, id, "open_group");
    record.title = format!("Group {id}");
    record.created = changed;
    record.changed = changed;
    record
}

/// Published post changed at `changed`.
pub fn post(id: i64, changed: i64) -> EntityRecord {
    let mut record = EntityRecord::new(EntityType::Post, id, "post");
    record.created = changed;
    record.changed = changed;
    record
}

pub fn reference(entity_id: i64, field_name: &str, target_id: i64) -> EntityReference {
    EntityReference {
        entity_type: EntityType::Node,
        entity_id,
        field_name: field_name.to_string(),
        target_id,
    }
}

/// Published comment created and changed at `at`.
pub fn comment(cid: i64, entity_type: EntityType, entity_id: i64, at: i64) -> Comment {
    Comment {
        cid,
        entity_type,
        entity_id,
        status: 1,
        created: at,
        changed: at,
    }
}

pub fn vote(id: i64, entity_type: EntityType, entity_id: i64, timestamp: i64) -> Vote {
    Vote {
        id,
        entity_type,
        entity_id,
        timestamp,
    }
}

pub fn group_content(id: i64, gid: i64, entity_type: EntityType, entity_id: i64, changed: i64) -> GroupContent {
    GroupContent {
        id,
        gid,
        entity_type,
        entity_id,
        changed,
    }
}

pub fn recipient(post_id: i64, group_id: i64) -> PostRecipient {
    PostRecipient { post_id, group_id }
}

/// A `custom_content_list` block with the fixture's settings.
pub fn content_list_block(id: i64, fixture: &TestContentList) -> BlockContent {
    let settings: BlockSettings =
        serde_json::from_value(fixture.to_json()).expect("valid block settings");
    BlockContent {
        id,
        bundle: CONTENT_LIST_BUNDLE.to_string(),
        settings,
    }
}

/// Content builder over a memory store with the default plugins.
pub fn content_builder(
    store: &Arc<MemoryContentStore>,
    alters: QueryAlterRegistry,
    locale: LocaleService,
) -> ContentBuilder {
    let store: Arc<dyn ContentStore> = store.clone();
    ContentBuilder::new(
        Arc::clone(&store),
        Arc::new(ContentBlockManager::with_defaults()),
        Arc::new(alters),
        Arc::new(TeaserViewBuilder::new(store)),
        Arc::new(locale),
    )
}

/// Test application wrapper using the real kernel routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub content: Arc<MemoryContentStore>,
    pub users: Arc<MemoryUserStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_locale(LocaleService::in_memory("en"))
    }

    pub fn with_locale(locale: LocaleService) -> Self {
        let content = Arc::new(MemoryContentStore::new());
        let users = Arc::new(MemoryUserStore::new());

        let content_store: Arc<dyn ContentStore> = content.clone();
        let user_store: Arc<dyn UserStore> = users.clone();
        let state = AppState::with_stores(
            content_store,
            user_store,
            Arc::new(locale),
            StateOptions::default(),
        );

        Self {
            router: routes::app(state.clone()),
            state,
            content,
            users,
        }
    }

    /// Send a request through the router.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    /// GET a URI and parse the JSON body.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let response = self.get(uri).await;
        let status = response.status();
        let body = body_string(response).await;
        let json = serde_json::from_str(&body).unwrap_or(Value::String(body));
        (status, json)
    }
}

/// Read a response body into a string.
pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
