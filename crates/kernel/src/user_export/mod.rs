//! User export: one column per export plugin, ordered by plugin weight.

mod plugins;

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use crate::models::User;
use crate::ranking::ContentStore;
use crate::services::locale::LocaleService;

pub use plugins::{UserEmail, UserEventsCreated, UserFirstName, UserLastName};

/// Services available to export plugins.
pub struct ExportContext {
    pub store: Arc<dyn ContentStore>,
}

#[async_trait]
pub trait UserExportPlugin: Send + Sync {
    fn id(&self) -> &'static str;

    /// Untranslated label; also the default header.
    fn label(&self) -> &'static str;

    /// Column position (lower = further left).
    fn weight(&self) -> i32;

    fn header(&self, locale: &LocaleService) -> String {
        locale.t(self.label())
    }

    async fn value(&self, user: &User, ctx: &ExportContext) -> Result<String>;
}

/// Export plugins in weight order.
#[derive(Default)]
pub struct UserExportRegistry {
    plugins: Vec<Arc<dyn UserExportPlugin>>,
}

impl UserExportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(UserFirstName));
        registry.register(Arc::new(UserLastName));
        registry.register(Arc::new(UserEmail));
        registry.register(Arc::new(UserEventsCreated));
        registry
    }

    pub fn register(&mut self, plugin: Arc<dyn UserExportPlugin>) {
        self.plugins.push(plugin);
        self.plugins.sort_by_key(|p| p.weight());
    }

    pub fn plugins(&self) -> &[Arc<dyn UserExportPlugin>] {
        &self.plugins
    }
}

/// Exported table: a header row and one row per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub struct UserExporter {
    registry: Arc<UserExportRegistry>,
    context: ExportContext,
    locale: Arc<LocaleService>,
}

impl UserExporter {
    pub fn new(
        registry: Arc<UserExportRegistry>,
        store: Arc<dyn ContentStore>,
        locale: Arc<LocaleService>,
    ) -> Self {
        Self {
            registry,
            context: ExportContext { store },
            locale,
        }
    }

    pub async fn export(&self, users: &[User]) -> Result<ExportTable> {
        let plugins = self.registry.plugins();
        let header = plugins.iter().map(|p| p.header(&self.locale)).collect();

        let mut rows = Vec::with_capacity(users.len());
        for user in users {
            let mut row = Vec::with_capacity(plugins.len());
            for plugin in plugins {
                let value = plugin
                    .value(user, &self.context)
                    .await
                    .with_context(|| format!("export plugin {} failed for {}", plugin.id(), user.id))?;
                row.push(value);
            }
            rows.push(row);
        }

        tracing::info!(users = users.len(), columns = plugins.len(), "exported users");
        Ok(ExportTable { header, rows })
    }
}
