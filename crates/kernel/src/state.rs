//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::content_block::{
    ContentBlockManager, ContentBuilder, QueryAlterRegistry, TeaserViewBuilder,
};
use crate::db;
use crate::group_request::AnonymousRequestForm;
use crate::ranking::{ContentStore, PgContentStore};
use crate::report::FieldHandlerRegistry;
use crate::routing::RouteRegistry;
use crate::services::locale::LocaleService;
use crate::user_export::{UserExportRegistry, UserExporter};
use crate::user_query::{PgUserStore, QueryUser, UserStore};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL connection pool; absent when running on in-memory stores.
    db: Option<PgPool>,

    content_store: Arc<dyn ContentStore>,
    user_store: Arc<dyn UserStore>,

    content_builder: ContentBuilder,
    query_user: QueryUser,
    request_form: AnonymousRequestForm,
    field_handlers: FieldHandlerRegistry,
    routes: Arc<RouteRegistry>,
    locale: Arc<LocaleService>,
    exporter: UserExporter,

    /// Maximum users per export request.
    export_batch_size: u64,
}

impl AppState {
    /// Create state backed by PostgreSQL.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        db::run_migrations(&db)
            .await
            .context("failed to run migrations")?;

        let locale = LocaleService::new(db.clone(), config.default_language.as_str());
        locale
            .load_language(&config.default_language)
            .await
            .context("failed to load interface translations")?;

        let state = Self::build(
            Some(db.clone()),
            Arc::new(PgContentStore::new(db.clone())),
            Arc::new(PgUserStore::new(db)),
            Arc::new(locale),
            StateOptions::from(config),
        );
        info!("application state initialized");
        Ok(state)
    }

    /// Create state on top of the given stores, with no database attached.
    ///
    /// Used by tests and by embedders that bring their own storage.
    pub fn with_stores(
        content_store: Arc<dyn ContentStore>,
        user_store: Arc<dyn UserStore>,
        locale: Arc<LocaleService>,
        options: StateOptions,
    ) -> Self {
        Self::build(None, content_store, user_store, locale, options)
    }

    fn build(
        db: Option<PgPool>,
        content_store: Arc<dyn ContentStore>,
        user_store: Arc<dyn UserStore>,
        locale: Arc<LocaleService>,
        options: StateOptions,
    ) -> Self {
        let routes = Arc::new(RouteRegistry::with_defaults());
        let views = Arc::new(TeaserViewBuilder::new(Arc::clone(&content_store)));

        let content_builder = ContentBuilder::new(
            Arc::clone(&content_store),
            Arc::new(ContentBlockManager::with_defaults()),
            Arc::new(options.alters),
            views,
            Arc::clone(&locale),
        );
        let exporter = UserExporter::new(
            Arc::new(UserExportRegistry::with_defaults()),
            Arc::clone(&content_store),
            Arc::clone(&locale),
        );

        Self {
            inner: Arc::new(AppStateInner {
                db,
                query_user: QueryUser::new(Arc::clone(&user_store)),
                request_form: AnonymousRequestForm::new(Arc::clone(&routes), Arc::clone(&locale)),
                field_handlers: FieldHandlerRegistry::with_defaults(),
                content_store,
                user_store,
                content_builder,
                routes,
                locale,
                exporter,
                export_batch_size: options.export_batch_size,
            }),
        }
    }

    /// Get the database pool, if the state is backed by PostgreSQL.
    pub fn db(&self) -> Option<&PgPool> {
        self.inner.db.as_ref()
    }

    pub fn content_store(&self) -> &Arc<dyn ContentStore> {
        &self.inner.content_store
    }

    pub fn user_store(&self) -> &Arc<dyn UserStore> {
        &self.inner.user_store
    }

    pub fn content_builder(&self) -> &ContentBuilder {
        &self.inner.content_builder
    }

    pub fn query_user(&self) -> &QueryUser {
        &self.inner.query_user
    }

    pub fn request_form(&self) -> &AnonymousRequestForm {
        &self.inner.request_form
    }

    pub fn field_handlers(&self) -> &FieldHandlerRegistry {
        &self.inner.field_handlers
    }

    pub fn routes(&self) -> &RouteRegistry {
        &self.inner.routes
    }

    pub fn locale(&self) -> &LocaleService {
        &self.inner.locale
    }

    pub fn exporter(&self) -> &UserExporter {
        &self.inner.exporter
    }

    pub fn export_batch_size(&self) -> u64 {
        self.inner.export_batch_size
    }

    /// Check if PostgreSQL is healthy. `None` when no database is attached.
    pub async fn postgres_healthy(&self) -> Option<bool> {
        match self.db() {
            Some(pool) => Some(db::check_health(pool).await),
            None => None,
        }
    }
}

/// Settings for [`AppState`] that do not come from storage.
pub struct StateOptions {
    /// Alter callbacks applied to every content list selection.
    pub alters: QueryAlterRegistry,
    pub export_batch_size: u64,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            alters: QueryAlterRegistry::new(),
            export_batch_size: 1000,
        }
    }
}

impl From<&Config> for StateOptions {
    fn from(config: &Config) -> Self {
        Self {
            export_batch_size: config.export_batch_size,
            ..Self::default()
        }
    }
}
