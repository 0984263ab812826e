//! Content block plugin registry.

use std::collections::HashMap;
use std::sync::Arc;

use commons_sdk::types::ContentBlockDefinition;

use super::plugin::{
    ContentBlockPlugin, EventContentBlock, GroupContentBlock, TopicContentBlock,
};

/// Plugins keyed by id, built once at startup.
#[derive(Default)]
pub struct ContentBlockManager {
    plugins: HashMap<String, Arc<dyn ContentBlockPlugin>>,
}

impl ContentBlockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager holding the built-in plugins.
    pub fn with_defaults() -> Self {
        let mut manager = Self::new();
        manager.register(Arc::new(TopicContentBlock::default()));
        manager.register(Arc::new(EventContentBlock::default()));
        manager.register(Arc::new(GroupContentBlock::default()));
        manager
    }

    /// Register a plugin, replacing any plugin with the same id.
    pub fn register(&mut self, plugin: Arc<dyn ContentBlockPlugin>) {
        let id = plugin.definition().id.clone();
        if self.plugins.insert(id.clone(), plugin).is_some() {
            tracing::warn!(plugin = %id, "content block plugin replaced");
        }
    }

    pub fn get(&self, plugin_id: &str) -> Option<Arc<dyn ContentBlockPlugin>> {
        self.plugins.get(plugin_id).cloned()
    }

    /// Definitions sorted by id.
    pub fn definitions(&self) -> Vec<&ContentBlockDefinition> {
        let mut definitions: Vec<_> = self.plugins.values().map(|p| p.definition()).collect();
        definitions.sort_by(|a, b| a.id.cmp(&b.id));
        definitions
    }
}

impl std::fmt::Debug for ContentBlockManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentBlockManager")
            .field("plugins", &self.plugins.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_register_builtin_plugins() {
        let manager = ContentBlockManager::with_defaults();
        let ids: Vec<&str> = manager
            .definitions()
            .iter()
            .map(|d| d.id.as_str())
            .collect();

        assert_eq!(
            ids,
            vec![
                "event_content_block",
                "group_content_block",
                "topic_content_block"
            ]
        );
        assert!(manager.get("missing").is_none());
    }

    #[test]
    fn topic_plugin_lists_topic_nodes() {
        let manager = ContentBlockManager::with_defaults();
        let plugin = manager.get("topic_content_block");
        let definition = plugin.as_ref().map(|p| p.definition());

        assert_eq!(definition.map(|d| d.entity_type_id.as_str()), Some("node"));
        assert_eq!(definition.and_then(|d| d.bundle.as_deref()), Some("topic"));
    }
}
