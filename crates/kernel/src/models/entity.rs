//! Content entity records: nodes, groups, posts and their reference fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Entity types the kernel knows how to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Node,
    Group,
    Post,
    Comment,
}

/// Raised when an entity type id does not name a known type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown entity type: {0}")]
pub struct UnknownEntityType(pub String);

impl EntityType {
    /// Machine name, as stored in `entity_type` columns.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Group => "group",
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }

    /// Table holding the entity's field data.
    pub fn data_table(&self) -> &'static str {
        match self {
            Self::Node => "node_field_data",
            Self::Group => "groups_field_data",
            Self::Post => "post_field_data",
            Self::Comment => "comment_field_data",
        }
    }

    /// Primary key column of the data table.
    pub fn id_key(&self) -> &'static str {
        match self {
            Self::Node => "nid",
            Self::Comment => "cid",
            Self::Group | Self::Post => "id",
        }
    }

    /// Bundle column of the data table.
    pub fn bundle_key(&self) -> &'static str {
        match self {
            Self::Comment => "comment_type",
            _ => "type",
        }
    }

    /// Label column of the data table; posts have none.
    pub fn label_key(&self) -> Option<&'static str> {
        match self {
            Self::Node => Some("title"),
            Self::Group => Some("label"),
            Self::Post | Self::Comment => None,
        }
    }

    /// Groups own content through group-content rows and posts, so they
    /// aggregate interactions differently from every other type.
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = UnknownEntityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Self::Node),
            "group" => Ok(Self::Group),
            "post" => Ok(Self::Post),
            "comment" => Ok(Self::Comment),
            other => Err(UnknownEntityType(other.to_string())),
        }
    }
}

/// A row of an entity data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    pub entity_type: EntityType,

    pub id: i64,

    /// Bundle machine name (e.g. "topic", "event", "open_group").
    pub bundle: String,

    /// Owner / author.
    pub uid: Option<Uuid>,

    /// Title or label.
    pub title: String,

    /// Publication status (0 = unpublished, 1 = published).
    pub status: i16,

    /// Unix timestamp when created.
    pub created: i64,

    /// Unix timestamp when last changed.
    pub changed: i64,
}

impl EntityRecord {
    /// Published record with zeroed timestamps.
    pub fn new(entity_type: EntityType, id: i64, bundle: impl Into<String>) -> Self {
        Self {
            entity_type,
            id,
            bundle: bundle.into(),
            uid: None,
            title: String::new(),
            status: 1,
            created: 0,
            changed: 0,
        }
    }

    /// Whether the record is published.
    pub fn is_published(&self) -> bool {
        self.status == 1
    }

    /// Read a data table column by name.
    ///
    /// Returns `None` for columns the record does not carry, which makes
    /// conditions on them fail rather than match.
    pub fn column(&self, name: &str) -> Option<Value> {
        if name == self.entity_type.id_key() {
            return Some(Value::from(self.id));
        }
        if name == self.entity_type.bundle_key() {
            return Some(Value::from(self.bundle.clone()));
        }
        match name {
            "title" | "label" => Some(Value::from(self.title.clone())),
            "uid" => self.uid.map(|u| Value::from(u.to_string())),
            "status" => Some(Value::from(self.status)),
            "created" => Some(Value::from(self.created)),
            "changed" => Some(Value::from(self.changed)),
            _ => None,
        }
    }
}

/// One value of an entity reference field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityReference {
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub field_name: String,
    pub target_id: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entity_type_round_trips_through_str() {
        for t in [
            EntityType::Node,
            EntityType::Group,
            EntityType::Post,
            EntityType::Comment,
        ] {
            assert_eq!(t.as_str().parse::<EntityType>().unwrap(), t);
        }
        assert_eq!(
            "taxonomy_term".parse::<EntityType>(),
            Err(UnknownEntityType("taxonomy_term".to_string()))
        );
    }

    #[test]
    fn node_uses_nid_column() {
        let mut node = EntityRecord::new(EntityType::Node, 7, "topic");
        node.changed = 42;

        assert_eq!(node.column("nid"), Some(Value::from(7)));
        assert_eq!(node.column("id"), None);
        assert_eq!(node.column("type"), Some(Value::from("topic")));
        assert_eq!(node.column("changed"), Some(Value::from(42)));
        assert_eq!(node.column("field_missing"), None);
    }
}
