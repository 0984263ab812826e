//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Public site URL, reported at startup (default: `http://localhost:{port}`).
    pub site_url: String,

    /// Interface language for translated strings (default: "en").
    pub default_language: String,

    /// Upper bound on users written by a single export request (default: 1000).
    pub export_batch_size: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let site_url = env::var("SITE_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));

        let default_language = env::var("DEFAULT_LANGUAGE")
            .map(|v| v.trim().to_lowercase())
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "en".to_string());

        let export_batch_size = env::var("EXPORT_BATCH_SIZE")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .context("EXPORT_BATCH_SIZE must be a valid u64")?;

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            site_url,
            default_language,
            export_batch_size,
        })
    }
}
