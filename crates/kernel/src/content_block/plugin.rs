//! Content block plugins.
//!
//! A plugin declares what a content list block lists and turns the editor's
//! reference field choices into selection filters.

use commons_sdk::types::{ContentBlockDefinition, FieldFilters};

use crate::ranking::{ReferenceSource, SelectionCriteria};

/// Field holding the groups an entity belongs to. Filtering on it matches
/// group membership rather than an entity reference row.
pub const GROUP_FIELD: &str = "field_group";

pub trait ContentBlockPlugin: Send + Sync {
    fn definition(&self) -> &ContentBlockDefinition;

    /// Add conditions for the filled reference fields.
    ///
    /// Only called when at least one field has values.
    fn query(&self, criteria: &mut SelectionCriteria, fields: &FieldFilters) {
        apply_reference_fields(self.definition(), criteria, fields);
    }
}

/// One "references any of" condition per declared field.
///
/// Fields the definition does not declare are ignored.
pub fn apply_reference_fields(
    definition: &ContentBlockDefinition,
    criteria: &mut SelectionCriteria,
    fields: &FieldFilters,
) {
    for (field, ids) in fields {
        if !definition.declares(field) {
            tracing::debug!(plugin = %definition.id, field = %field, "ignoring undeclared field");
            continue;
        }
        let source = if field == GROUP_FIELD {
            ReferenceSource::GroupMembership
        } else {
            ReferenceSource::Field(field.clone())
        };
        criteria.add_reference(source, ids.clone());
    }
}

/// Lists topics by type, tag, or group.
pub struct TopicContentBlock {
    definition: ContentBlockDefinition,
}

impl Default for TopicContentBlock {
    fn default() -> Self {
        Self {
            definition: ContentBlockDefinition::new("topic_content_block", "Topic", "node")
                .bundle("topic")
                .field("field_topic_type")
                .field("field_content_tags")
                .field(GROUP_FIELD),
        }
    }
}

impl ContentBlockPlugin for TopicContentBlock {
    fn definition(&self) -> &ContentBlockDefinition {
        &self.definition
    }
}

/// Lists events by type, tag, or group.
pub struct EventContentBlock {
    definition: ContentBlockDefinition,
}

impl Default for EventContentBlock {
    fn default() -> Self {
        Self {
            definition: ContentBlockDefinition::new("event_content_block", "Event", "node")
                .bundle("event")
                .field("field_event_type")
                .field("field_content_tags")
                .field(GROUP_FIELD),
        }
    }
}

impl ContentBlockPlugin for EventContentBlock {
    fn definition(&self) -> &ContentBlockDefinition {
        &self.definition
    }
}

/// Lists groups of any type by tag.
pub struct GroupContentBlock {
    definition: ContentBlockDefinition,
}

impl Default for GroupContentBlock {
    fn default() -> Self {
        Self {
            definition: ContentBlockDefinition::new("group_content_block", "Group", "group")
                .field("field_group_tags"),
        }
    }
}

impl ContentBlockPlugin for GroupContentBlock {
    fn definition(&self) -> &ContentBlockDefinition {
        &self.definition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityType;
    use crate::ranking::ReferenceFilter;

    #[test]
    fn group_field_filters_on_membership() {
        let plugin = TopicContentBlock::default();
        let mut criteria = SelectionCriteria::new(EntityType::Node, 5);
        let mut fields = FieldFilters::new();
        fields.insert(GROUP_FIELD.to_string(), vec![3]);
        fields.insert("field_topic_type".to_string(), vec![7, 8]);

        plugin.query(&mut criteria, &fields);

        assert_eq!(
            criteria.references,
            vec![
                ReferenceFilter {
                    source: ReferenceSource::GroupMembership,
                    target_ids: vec![3],
                },
                ReferenceFilter {
                    source: ReferenceSource::Field("field_topic_type".to_string()),
                    target_ids: vec![7, 8],
                },
            ]
        );
    }

    #[test]
    fn undeclared_fields_are_ignored() {
        let plugin = GroupContentBlock::default();
        let mut criteria = SelectionCriteria::new(EntityType::Group, 5);
        let mut fields = FieldFilters::new();
        fields.insert("field_topic_type".to_string(), vec![1]);

        plugin.query(&mut criteria, &fields);

        assert!(criteria.references.is_empty());
    }
}
