//! Content list block records.

use anyhow::{Context, Result};
use commons_sdk::types::{BlockLink, FieldFilters};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Bundle of the blocks the content builder renders.
pub const CONTENT_LIST_BUNDLE: &str = "custom_content_list";

/// A placed block instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockContent {
    pub id: i64,

    /// Block bundle.
    pub bundle: String,

    /// Editor-chosen settings.
    #[serde(flatten)]
    pub settings: BlockSettings,
}

/// Settings of a content list block, stored as JSONB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockSettings {
    /// Content block plugin that lists the entities.
    pub plugin_id: String,

    /// Field the editor restricted the selection to, if any.
    #[serde(default)]
    pub plugin_field: Option<String>,

    /// Referenced ids per filterable field.
    #[serde(default)]
    pub field_values: FieldFilters,

    /// Sort option: a ranking mode or a base table column.
    #[serde(default = "default_sorting")]
    pub sorting: String,

    /// Number of entities to show.
    #[serde(default = "default_item_amount")]
    pub item_amount: u32,

    /// Optional "read more" link.
    #[serde(default)]
    pub link: Option<BlockLink>,
}

fn default_sorting() -> String {
    "changed".to_string()
}

fn default_item_amount() -> u32 {
    5
}

impl BlockSettings {
    pub fn new(plugin_id: impl Into<String>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            plugin_field: None,
            field_values: FieldFilters::new(),
            sorting: default_sorting(),
            item_amount: default_item_amount(),
            link: None,
        }
    }
}

impl BlockContent {
    /// Load a block by id.
    pub async fn load(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let row: Option<(i64, String, serde_json::Value)> =
            sqlx::query_as("SELECT id, type, settings FROM block_content WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await
                .context("failed to fetch block content")?;

        let Some((id, bundle, settings)) = row else {
            return Ok(None);
        };

        let settings: BlockSettings = serde_json::from_value(settings)
            .with_context(|| format!("failed to parse settings of block {id}"))?;

        Ok(Some(Self {
            id,
            bundle,
            settings,
        }))
    }

    /// Field names the selection filters on.
    ///
    /// Without an explicit field choice every field the plugin declares is
    /// used; with one, only that field.
    pub fn filter_field_names(&self, declared: &[String]) -> Vec<String> {
        match self.settings.plugin_field.as_deref() {
            Some(field) if !field.is_empty() => vec![field.to_string()],
            _ => declared.to_vec(),
        }
    }

    /// Referenced ids for the selected filter fields, skipping empty ones.
    pub fn field_filters(&self, declared: &[String]) -> FieldFilters {
        self.filter_field_names(declared)
            .into_iter()
            .filter_map(|name| {
                self.settings
                    .field_values
                    .get(&name)
                    .filter(|ids| !ids.is_empty())
                    .map(|ids| (name, ids.clone()))
            })
            .collect()
    }
}
