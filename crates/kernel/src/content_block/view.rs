//! Entity view builders.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use commons_sdk::render::{self, RenderElement};

use crate::models::EntityType;
use crate::ranking::ContentStore;

/// View mode used by content list blocks.
pub const SMALL_TEASER: &str = "small_teaser";

/// Renders loaded entities in a view mode.
#[async_trait]
pub trait EntityViewBuilder: Send + Sync {
    /// Render entities in the order of `ids`. The returned element has one
    /// child per entity that could be loaded.
    async fn view_multiple(
        &self,
        entity_type: EntityType,
        ids: &[i64],
        view_mode: &str,
    ) -> Result<RenderElement>;
}

/// Teaser view: entity placeholder carrying the entity label.
pub struct TeaserViewBuilder {
    store: Arc<dyn ContentStore>,
}

impl TeaserViewBuilder {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EntityViewBuilder for TeaserViewBuilder {
    async fn view_multiple(
        &self,
        entity_type: EntityType,
        ids: &[i64],
        view_mode: &str,
    ) -> Result<RenderElement> {
        let records = self.store.load_entities(entity_type, ids).await?;

        let mut list = render::container().build();
        for (weight, record) in (0_i32..).zip(records.iter()) {
            let item = render::entity(entity_type.as_str(), record.id, view_mode)
                .class(&format!("{entity_type}--{view_mode}"))
                .class(&format!("{entity_type}--{}", record.bundle))
                .weight(weight)
                .child("label", render::markup("h4", &record.title).build())
                .build();
            list.set_child(&format!("{entity_type}_{}", record.id), item);
        }

        Ok(list)
    }
}
