//! Connection settings.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::error::{ExecuteError, Result};

/// Environment variable holding the database URL.
pub const DATABASE_URL_VAR: &str = "QUILL_DATABASE_URL";
/// Environment variable holding the pool size.
pub const MAX_CONNECTIONS_VAR: &str = "QUILL_MAX_CONNECTIONS";

const DEFAULT_URL: &str = "sqlite::memory:";

/// Settings used to open a SQLite pool.
///
/// Every connection to `sqlite::memory:` opens its own private database, so
/// the pool size defaults to one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteConfig {
    url: String,
    max_connections: u32,
    create_if_missing: bool,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: String::from(DEFAULT_URL),
            max_connections: 1,
            create_if_missing: true,
        }
    }
}

impl SqliteConfig {
    /// Creates settings for an in-memory database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `QUILL_DATABASE_URL` and `QUILL_MAX_CONNECTIONS`, falling back to
    /// the defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError::InvalidConfig`] when the pool size is not a
    /// positive number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(DATABASE_URL_VAR) {
            config.url = url;
        }
        if let Some(value) = lookup(MAX_CONNECTIONS_VAR) {
            config.max_connections = value
                .trim()
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ExecuteError::InvalidConfig {
                    key: MAX_CONNECTIONS_VAR,
                    value,
                })?;
        }
        Ok(config)
    }

    /// Sets the database URL.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the maximum pool size.
    #[must_use]
    pub const fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Sets whether a missing database file is created.
    #[must_use]
    pub const fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Returns the database URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.url
    }

    /// Returns the maximum pool size.
    #[must_use]
    pub const fn pool_size(&self) -> u32 {
        self.max_connections
    }

    /// Opens a pool with these settings.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError::Connect`] when the URL is malformed or the
    /// database cannot be opened.
    pub async fn connect(&self) -> Result<SqlitePool> {
        let options = SqliteConnectOptions::from_str(&self.url)
            .map_err(ExecuteError::Connect)?
            .create_if_missing(self.create_if_missing);
        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(options)
            .await
            .map_err(ExecuteError::Connect)?;
        info!(
            url = %self.url,
            max_connections = self.max_connections,
            "Connected to SQLite"
        );
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SqliteConfig::new();
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.pool_size(), 1);
        assert!(config.create_if_missing);
    }

    #[test]
    fn test_from_lookup() {
        let config = SqliteConfig::from_lookup(lookup(&[
            (DATABASE_URL_VAR, "sqlite://library.db"),
            (MAX_CONNECTIONS_VAR, "4"),
        ]))
        .unwrap();
        assert_eq!(config.database_url(), "sqlite://library.db");
        assert_eq!(config.pool_size(), 4);
    }

    #[test]
    fn test_from_lookup_unset() {
        let config = SqliteConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SqliteConfig::default());
    }

    #[test]
    fn test_invalid_pool_size() {
        for bad in ["zero", "0", "-2"] {
            let err = SqliteConfig::from_lookup(lookup(&[(MAX_CONNECTIONS_VAR, bad)])).unwrap_err();
            assert!(matches!(
                err,
                ExecuteError::InvalidConfig { key: MAX_CONNECTIONS_VAR, .. }
            ));
        }
    }

    #[test]
    fn test_builder_setters() {
        let config = SqliteConfig::new()
            .url("sqlite://other.db")
            .max_connections(8)
            .create_if_missing(false);
        assert_eq!(config.database_url(), "sqlite://other.db");
        assert_eq!(config.pool_size(), 8);
        assert!(!config.create_if_missing);
    }

    #[tokio::test]
    async fn test_connect_in_memory() {
        let pool = SqliteConfig::new().connect().await.unwrap();
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }

    #[tokio::test]
    async fn test_connect_missing_file() {
        let err = SqliteConfig::new()
            .url("sqlite:///nonexistent-dir/quill.db")
            .create_if_missing(false)
            .connect()
            .await
            .unwrap_err();
        assert!(matches!(err, ExecuteError::Connect(_)));
    }
}
