//! Views field handlers for content reports.

use std::collections::HashMap;
use std::sync::Arc;

use commons_sdk::render::{self, RenderElement};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::routing::{CLOSE_REPORT_ROUTE, RouteError, RouteRegistry};
use crate::services::locale::LocaleService;

/// One row of a listing, as seen by a field handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Id of the row's entity, if the row has one.
    pub entity_id: Option<i64>,
}

impl ResultRow {
    pub fn new(entity_id: i64) -> Self {
        Self {
            entity_id: Some(entity_id),
        }
    }
}

/// Services available while rendering a field.
pub struct FieldContext<'a> {
    pub routes: &'a RouteRegistry,
    pub locale: &'a LocaleService,
}

pub trait FieldHandler: Send + Sync {
    /// Plugin id the listing refers to the handler by.
    fn id(&self) -> &'static str;

    fn default_label(&self, locale: &LocaleService) -> String;

    /// Link target for a row; `None` when the row has nothing to link to.
    fn url(&self, row: &ResultRow, routes: &RouteRegistry) -> Result<Option<String>, RouteError>;

    /// Render the field for a row. An explicit `label` replaces the default.
    fn render(&self, row: &ResultRow, label: Option<&str>, ctx: &FieldContext<'_>) -> RenderElement {
        let url = match self.url(row, ctx.routes) {
            Ok(Some(url)) => url,
            Ok(None) => return RenderElement::default(),
            Err(e) => {
                warn!(handler = self.id(), error = %e, "failed to build field link");
                return RenderElement::default();
            }
        };
        let text = label.map_or_else(|| self.default_label(ctx.locale), str::to_string);
        render::link(&url, &text).build()
    }
}

/// Link to close a reported flagging.
pub struct LinkReportClose;

impl FieldHandler for LinkReportClose {
    fn id(&self) -> &'static str {
        "flagging_link_close"
    }

    fn default_label(&self, locale: &LocaleService) -> String {
        locale.t("Close")
    }

    fn url(&self, row: &ResultRow, routes: &RouteRegistry) -> Result<Option<String>, RouteError> {
        let Some(flagging) = row.entity_id else {
            return Ok(None);
        };
        let flagging = flagging.to_string();
        routes
            .url(CLOSE_REPORT_ROUTE, &[("flagging", flagging.as_str())])
            .map(Some)
    }
}

/// Field handlers keyed by id.
#[derive(Default)]
pub struct FieldHandlerRegistry {
    handlers: HashMap<&'static str, Arc<dyn FieldHandler>>,
}

impl FieldHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(LinkReportClose));
        registry
    }

    pub fn register(&mut self, handler: Arc<dyn FieldHandler>) {
        self.handlers.insert(handler.id(), handler);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn FieldHandler>> {
        self.handlers.get(id).cloned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn render(row: &ResultRow, label: Option<&str>, locale: &LocaleService) -> RenderElement {
        let routes = RouteRegistry::with_defaults();
        let ctx = FieldContext {
            routes: &routes,
            locale,
        };
        FieldHandlerRegistry::with_defaults()
            .get("flagging_link_close")
            .unwrap()
            .render(row, label, &ctx)
    }

    #[test]
    fn close_link_targets_close_route() {
        let locale = LocaleService::in_memory("en");
        let link = render(&ResultRow::new(42), None, &locale);

        assert_eq!(link.element_type, "link");
        assert_eq!(link.url.as_deref(), Some("/admin/content/reports/42/close"));
        assert_eq!(link.value.as_deref(), Some("Close"));
    }

    #[test]
    fn default_label_is_translated() {
        let locale = LocaleService::in_memory("nl");
        locale.insert("nl", "Close", "Sluiten");

        let link = render(&ResultRow::new(1), None, &locale);
        assert_eq!(link.value.as_deref(), Some("Sluiten"));

        let custom = render(&ResultRow::new(1), Some("Resolve"), &locale);
        assert_eq!(custom.value.as_deref(), Some("Resolve"));
    }

    #[test]
    fn row_without_entity_renders_nothing() {
        let locale = LocaleService::in_memory("en");
        assert!(render(&ResultRow::default(), None, &locale).is_empty());
    }
}
