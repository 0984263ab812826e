//! Core types for content block plugins.
//!
//! A content block plugin declares which entity type it lists and which
//! reference fields an editor may filter on. The kernel turns the editor's
//! choices into [`FieldFilters`] and hands them back to the plugin.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reference field values keyed by field name.
///
/// Each entry means "the entity references any of these ids through this
/// field". Entries are combined with AND.
pub type FieldFilters = BTreeMap<String, Vec<i64>>;

/// Static description of a content block plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlockDefinition {
    /// Plugin machine name (e.g. "topic_content_block").
    pub id: String,

    /// Human-readable label.
    pub label: String,

    /// Entity type the block lists ("node", "group", "post").
    pub entity_type_id: String,

    /// Restrict to a bundle, if any.
    #[serde(default)]
    pub bundle: Option<String>,

    /// Filterable reference fields, in display order.
    #[serde(default)]
    pub fields: Vec<String>,
}

impl ContentBlockDefinition {
    /// Create a definition without bundle or fields.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        entity_type_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            entity_type_id: entity_type_id.into(),
            bundle: None,
            fields: Vec::new(),
        }
    }

    /// Restrict the listing to a bundle.
    pub fn bundle(mut self, bundle: impl Into<String>) -> Self {
        self.bundle = Some(bundle.into());
        self
    }

    /// Declare a filterable field.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    /// Whether the plugin declares this field.
    pub fn declares(&self, field_name: &str) -> bool {
        self.fields.iter().any(|f| f == field_name)
    }
}

/// "Read more" link configured on a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockLink {
    pub uri: String,
    pub title: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn definition_builder() {
        let def = ContentBlockDefinition::new("topic_content_block", "Topic", "node")
            .bundle("topic")
            .field("field_topic_type")
            .field("field_content_tags");

        assert_eq!(def.bundle.as_deref(), Some("topic"));
        assert!(def.declares("field_content_tags"));
        assert!(!def.declares("field_event_type"));
    }

    #[test]
    fn definition_defaults_from_json() {
        let json = r#"{"id": "g", "label": "Groups", "entity_type_id": "group"}"#;
        let def: ContentBlockDefinition = serde_json::from_str(json).unwrap();

        assert!(def.bundle.is_none());
        assert!(def.fields.is_empty());
    }
}
