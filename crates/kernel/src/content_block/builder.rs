//! Content list block builder.
//!
//! Loads a `custom_content_list` block, derives selection criteria from its
//! plugin and field values, runs the alter callbacks and the ranked
//! selector, and renders the result as teasers.

use std::sync::Arc;

use commons_sdk::render::{self, RenderElement};
use tracing::{debug, warn};

use super::alter::QueryAlterRegistry;
use super::manager::ContentBlockManager;
use super::view::{EntityViewBuilder, SMALL_TEASER};
use crate::models::{BlockContent, CONTENT_LIST_BUNDLE, EntityType};
use crate::ranking::{ContentStore, RankedSelector, SelectionCriteria, SortMode};
use crate::services::locale::LocaleService;

/// Entity type id of custom blocks.
pub const BLOCK_CONTENT_ENTITY_TYPE: &str = "block_content";

pub struct ContentBuilder {
    store: Arc<dyn ContentStore>,
    selector: RankedSelector,
    manager: Arc<ContentBlockManager>,
    alters: Arc<QueryAlterRegistry>,
    views: Arc<dyn EntityViewBuilder>,
    locale: Arc<LocaleService>,
}

impl ContentBuilder {
    pub fn new(
        store: Arc<dyn ContentStore>,
        manager: Arc<ContentBlockManager>,
        alters: Arc<QueryAlterRegistry>,
        views: Arc<dyn EntityViewBuilder>,
        locale: Arc<LocaleService>,
    ) -> Self {
        Self {
            selector: RankedSelector::new(Arc::clone(&store)),
            store,
            manager,
            alters,
            views,
            locale,
        }
    }

    /// Build the render tree of a content list block.
    ///
    /// Anything other than an existing `custom_content_list` block renders
    /// as an empty element.
    pub async fn build(&self, entity_id: i64, entity_type_id: &str, bundle: &str) -> RenderElement {
        self.build_at(entity_id, entity_type_id, bundle, chrono::Utc::now().timestamp())
            .await
    }

    /// Like [`ContentBuilder::build`], measuring ranking windows from `now`.
    pub async fn build_at(
        &self,
        entity_id: i64,
        entity_type_id: &str,
        bundle: &str,
        now: i64,
    ) -> RenderElement {
        if entity_type_id != BLOCK_CONTENT_ENTITY_TYPE || bundle != CONTENT_LIST_BUNDLE {
            return RenderElement::default();
        }

        let block = match self.store.load_block(entity_id).await {
            Ok(Some(block)) if block.bundle == bundle => block,
            Ok(_) => return RenderElement::default(),
            Err(e) => {
                warn!(block = entity_id, error = %e, "failed to load content block");
                return RenderElement::default();
            }
        };

        let entities = match self.entities(&block, now).await {
            Some(mut list) => {
                list.prefix = Some(r#"<div class="content-list__items">"#.to_string());
                list.suffix = Some("</div>".to_string());
                list
            }
            None => render::markup("div", &self.locale.t("No matching content found"))
                .class("card__block")
                .build(),
        };

        let mut content = render::container().child("entities", entities).build();
        if let Some(link) = Self::link(&block) {
            content.set_child("link", link);
        }

        render::container().child("content", content).build()
    }

    /// Select and render the block's entities; `None` when nothing matches.
    async fn entities(&self, block: &BlockContent, now: i64) -> Option<RenderElement> {
        let criteria = self.criteria(block)?;
        let entity_type = criteria.entity_type;

        let ids = match self.selector.select_at(&criteria, now).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(block = block.id, error = %e, "content block selection failed");
                return None;
            }
        };
        debug!(block = block.id, count = ids.len(), "content block selection");
        if ids.is_empty() {
            return None;
        }

        match self.views.view_multiple(entity_type, &ids, SMALL_TEASER).await {
            Ok(list) if !list.children.is_empty() => Some(list),
            Ok(_) => None,
            Err(e) => {
                warn!(block = block.id, error = %e, "failed to render content block entities");
                None
            }
        }
    }

    /// Selection criteria for a block, after plugin filters and alters.
    pub fn criteria(&self, block: &BlockContent) -> Option<SelectionCriteria> {
        let settings = &block.settings;
        let Some(plugin) = self.manager.get(&settings.plugin_id) else {
            warn!(block = block.id, plugin = %settings.plugin_id, "unknown content block plugin");
            return None;
        };
        let definition = plugin.definition();

        let entity_type: EntityType = match definition.entity_type_id.parse() {
            Ok(entity_type) => entity_type,
            Err(e) => {
                warn!(plugin = %definition.id, error = %e, "content block plugin lists unknown type");
                return None;
            }
        };
        let sort: SortMode = match settings.sorting.parse() {
            Ok(sort) => sort,
            Err(e) => {
                warn!(block = block.id, error = %e, "invalid content block sorting");
                return None;
            }
        };

        let mut criteria = SelectionCriteria::new(entity_type, settings.item_amount).sort(sort);
        if let Some(ref bundle) = definition.bundle {
            criteria = criteria.bundle(bundle.clone());
        }

        let fields = block.field_filters(&definition.fields);
        if !fields.is_empty() {
            plugin.query(&mut criteria, &fields);
        }

        self.alters.apply(&mut criteria, block);
        Some(criteria)
    }

    /// "Read more" footer with the block link.
    fn link(block: &BlockContent) -> Option<RenderElement> {
        let link = block.settings.link.as_ref()?;
        let anchor = render::link(&link_href(&link.uri), &link.title)
            .class("btn")
            .class("btn-flat")
            .build();

        Some(
            render::container()
                .tag("footer")
                .class("card__actionbar")
                .child("link", anchor)
                .build(),
        )
    }
}

/// Resolve a stored link URI to an href.
///
/// `internal:/path` becomes `/path`, `entity:node/1` becomes `/node/1`;
/// anything else is used as is.
fn link_href(uri: &str) -> String {
    if let Some(path) = uri.strip_prefix("internal:") {
        path.to_string()
    } else if let Some(path) = uri.strip_prefix("entity:") {
        format!("/{path}")
    } else {
        uri.to_string()
    }
}
