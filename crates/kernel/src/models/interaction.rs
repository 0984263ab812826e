//! Interaction records: comments, votes, and the group relations that map
//! content back to the group owning it.

use serde::{Deserialize, Serialize};

use super::EntityType;

/// A comment attached to an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub cid: i64,

    /// Type of the commented entity.
    pub entity_type: EntityType,

    /// Id of the commented entity.
    pub entity_id: i64,

    /// Publication status (0 = unpublished, 1 = published).
    pub status: i16,

    /// Unix timestamp when created.
    pub created: i64,

    /// Unix timestamp when last changed.
    pub changed: i64,
}

impl Comment {
    pub fn is_published(&self) -> bool {
        self.status == 1
    }

    pub fn targets(&self, entity_type: EntityType, entity_id: i64) -> bool {
        self.entity_type == entity_type && self.entity_id == entity_id
    }
}

/// A "like" on an entity or a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub id: i64,
    pub entity_type: EntityType,
    pub entity_id: i64,

    /// Unix timestamp of the vote.
    pub timestamp: i64,
}

impl Vote {
    pub fn targets(&self, entity_type: EntityType, entity_id: i64) -> bool {
        self.entity_type == entity_type && self.entity_id == entity_id
    }
}

/// Membership of a content entity in a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupContent {
    pub id: i64,

    /// Owning group.
    pub gid: i64,

    pub entity_type: EntityType,
    pub entity_id: i64,

    /// Unix timestamp when the relation last changed.
    pub changed: i64,
}

/// A post addressed to a group through its recipient field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecipient {
    pub post_id: i64,
    pub group_id: i64,
}
