//! Commons test utilities.
//!
//! Fixture builders, a fixed clock, and assertion helpers for the kernel's
//! integration tests. Fixtures are plain data so this crate stays free of
//! kernel types.

use serde_json::{Value as JsonValue, json};
use uuid::Uuid;

/// Fixed clock for ranking tests.
pub mod time {
    /// 2026-01-01T00:00:00Z.
    pub const NOW: i64 = 1_767_225_600;

    /// Seconds in a day.
    pub const DAY: i64 = 86_400;

    /// Timestamp `days` days before [`NOW`].
    pub fn days_ago(days: i64) -> i64 {
        NOW - days * DAY
    }

    /// Timestamp `seconds` seconds before [`NOW`].
    pub fn seconds_ago(seconds: i64) -> i64 {
        NOW - seconds
    }
}

/// Create a test user with default values.
pub fn test_user(name: &str) -> TestUser {
    TestUser {
        id: Uuid::now_v7(),
        name: name.to_string(),
        mail: format!("{name}@example.com"),
        status: 1,
        created: time::NOW,
        first_name: None,
        last_name: None,
    }
}

/// Create the anonymous account.
pub fn anonymous_user() -> TestUser {
    TestUser {
        id: Uuid::nil(),
        name: String::new(),
        mail: String::new(),
        status: 0,
        created: 0,
        first_name: None,
        last_name: None,
    }
}

/// A user account fixture.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub name: String,
    pub mail: String,
    pub status: i16,
    pub created: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl TestUser {
    /// Set a custom ID.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Set the creation timestamp.
    pub fn created_at(mut self, created: i64) -> Self {
        self.created = created;
        self
    }

    /// Set first and last name.
    pub fn named(mut self, first: &str, last: &str) -> Self {
        self.first_name = Some(first.to_string());
        self.last_name = Some(last.to_string());
        self
    }

    /// Set as blocked.
    pub fn blocked(mut self) -> Self {
        self.status = 0;
        self
    }
}

/// Create settings for a content list block using the given plugin.
pub fn content_list(plugin_id: &str) -> TestContentList {
    TestContentList {
        plugin_id: plugin_id.to_string(),
        plugin_field: None,
        field_values: serde_json::Map::new(),
        sorting: "changed".to_string(),
        item_amount: 5,
        link: None,
    }
}

/// Settings fixture for a `custom_content_list` block.
#[derive(Debug, Clone)]
pub struct TestContentList {
    pub plugin_id: String,
    pub plugin_field: Option<String>,
    pub field_values: serde_json::Map<String, JsonValue>,
    pub sorting: String,
    pub item_amount: u32,
    pub link: Option<(String, String)>,
}

impl TestContentList {
    /// Restrict filtering to a single field.
    pub fn with_plugin_field(mut self, field: &str) -> Self {
        self.plugin_field = Some(field.to_string());
        self
    }

    /// Set the referenced ids of a field.
    pub fn with_values(mut self, field: &str, ids: &[i64]) -> Self {
        self.field_values.insert(field.to_string(), json!(ids));
        self
    }

    pub fn sorted_by(mut self, sorting: &str) -> Self {
        self.sorting = sorting.to_string();
        self
    }

    pub fn amount(mut self, item_amount: u32) -> Self {
        self.item_amount = item_amount;
        self
    }

    /// Add a "read more" link.
    pub fn with_link(mut self, uri: &str, title: &str) -> Self {
        self.link = Some((uri.to_string(), title.to_string()));
        self
    }

    /// Settings as stored in `block_content.settings`.
    pub fn to_json(&self) -> JsonValue {
        let mut settings = json!({
            "plugin_id": self.plugin_id,
            "field_values": self.field_values,
            "sorting": self.sorting,
            "item_amount": self.item_amount,
        });
        if let Some(field) = &self.plugin_field {
            settings["plugin_field"] = json!(field);
        }
        if let Some((uri, title)) = &self.link {
            settings["link"] = json!({ "uri": uri, "title": title });
        }
        settings
    }
}

/// Assertion helpers for JSON content.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_builder() {
        let user = test_user("ada").named("Ada", "Lovelace").created_at(10);
        assert_eq!(user.mail, "ada@example.com");
        assert_eq!(user.first_name.as_deref(), Some("Ada"));
        assert_eq!(user.created, 10);
        assert_eq!(user.status, 1);
    }

    #[test]
    fn test_anonymous_user() {
        let user = anonymous_user();
        assert_eq!(user.id, Uuid::nil());
        assert_eq!(user.status, 0);
    }

    #[test]
    fn content_list_settings_json() {
        let settings = content_list("topic_content_block")
            .with_values("field_topic_type", &[3, 4])
            .with_link("internal:/all-topics", "All topics")
            .amount(3)
            .to_json();

        assert_eq!(settings["plugin_id"], "topic_content_block");
        assert_eq!(settings["field_values"]["field_topic_type"][1], 4);
        assert_eq!(settings["item_amount"], 3);
        assert_eq!(settings["link"]["title"], "All topics");
        assert!(settings.get("plugin_field").is_none());
    }

    #[test]
    fn days_ago_counts_back_from_now() {
        assert_eq!(time::NOW - time::days_ago(90), 90 * time::DAY);
        assert!(time::seconds_ago(1) < time::NOW);
    }

    #[test]
    fn test_assertions() {
        let json = serde_json::json!({"name": "test"});
        assert::has_key(&json, "name");
        assert::contains("hello world", "world");
        assert::not_contains("hello world", "foo");
    }
}
