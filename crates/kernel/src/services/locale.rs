//! Locale service for interface string translation.
//!
//! Loads translations into an in-memory cache and provides the `t()` lookup
//! used by the block builder, form builders, and field handlers.

use anyhow::{Context, Result};
use dashmap::DashMap;
use sqlx::PgPool;
use tracing::info;

/// Locale translation service.
pub struct LocaleService {
    pool: Option<PgPool>,
    /// Language used by [`LocaleService::t`].
    language: String,
    /// In-memory translation cache: key = "language\0context\0source" → translation.
    cache: DashMap<String, String>,
}

impl LocaleService {
    /// Create a locale service backed by the `locale_string` table.
    pub fn new(pool: PgPool, language: impl Into<String>) -> Self {
        Self {
            pool: Some(pool),
            language: language.into(),
            cache: DashMap::new(),
        }
    }

    /// Create a locale service without storage; translations come from
    /// [`LocaleService::insert`].
    pub fn in_memory(language: impl Into<String>) -> Self {
        Self {
            pool: None,
            language: language.into(),
            cache: DashMap::new(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Load all translations for a language into the cache.
    pub async fn load_language(&self, language: &str) -> Result<usize> {
        let Some(ref pool) = self.pool else {
            return Ok(0);
        };

        let rows: Vec<(String, String, String)> = sqlx::query_as(
            r#"
            SELECT source, translation, context
            FROM locale_string
            WHERE language = $1
            "#,
        )
        .bind(language)
        .fetch_all(pool)
        .await
        .context("failed to load translations")?;

        let count = rows.len();
        for (source, translation, context) in rows {
            self.insert_with_context(language, &context, &source, translation);
        }

        info!(language = %language, count = count, "loaded locale translations");
        Ok(count)
    }

    /// Cache a translation without context.
    pub fn insert(&self, language: &str, source: &str, translation: impl Into<String>) {
        self.insert_with_context(language, "", source, translation);
    }

    fn insert_with_context(
        &self,
        language: &str,
        context: &str,
        source: &str,
        translation: impl Into<String>,
    ) {
        self.cache
            .insert(cache_key(language, context, source), translation.into());
    }

    /// Translate a source string into the service language.
    pub fn t(&self, source: &str) -> String {
        self.translate(source, "", &self.language)
    }

    /// Translate a source string.
    ///
    /// Falls back to the context-free translation, then to the source string.
    pub fn translate(&self, source: &str, context: &str, language: &str) -> String {
        let key = cache_key(language, context, source);
        if let Some(translation) = self.cache.get(&key) {
            return translation.clone();
        }

        if !context.is_empty() {
            let key = cache_key(language, "", source);
            if let Some(translation) = self.cache.get(&key) {
                return translation.clone();
            }
        }

        source.to_string()
    }
}

/// Build a cache key from language, context, and source.
///
/// Uses a null byte separator so sources containing colons cannot collide.
fn cache_key(language: &str, context: &str, source: &str) -> String {
    format!("{language}\0{context}\0{source}")
}

impl std::fmt::Debug for LocaleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleService")
            .field("language", &self.language)
            .field("cache_size", &self.cache.len())
            .finish()
    }
}
