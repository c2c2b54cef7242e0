//! Store configuration read from the environment.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::StoreError;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Connection settings for the bestiary database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// `PostgreSQL` connection string.
    pub database_url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl StoreConfig {
    /// Reads `DATABASE_URL` (required) and `DATABASE_MAX_CONNECTIONS`
    /// (default 10) from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if `DATABASE_URL` is unset or
    /// `DATABASE_MAX_CONNECTIONS` is not a positive integer.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`], reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`StoreConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StoreError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                StoreError::Config("DATABASE_URL environment variable must be set".into())
            })?;
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| {
                    StoreError::Config(format!(
                        "DATABASE_MAX_CONNECTIONS must be a positive integer, got '{raw}'"
                    ))
                })?,
        };
        Ok(Self {
            database_url,
            max_connections,
        })
    }

    /// Opens a connection pool with these settings.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the database cannot be reached.
    pub async fn connect(&self) -> Result<PgPool, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect(&self.database_url)
            .await?;
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn test_defaults_max_connections() {
        let config = StoreConfig::from_lookup(env(&[("DATABASE_URL", "postgres://localhost/bestiary")]))
            .unwrap();

        assert_eq!(config.database_url, "postgres://localhost/bestiary");
        assert_eq!(config.max_connections, 10);
    }

    #[test]
    fn test_reads_max_connections() {
        let config = StoreConfig::from_lookup(env(&[
            ("DATABASE_URL", "postgres://localhost/bestiary"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
        ]))
        .unwrap();

        assert_eq!(config.max_connections, 4);
    }

    #[test]
    fn test_missing_database_url_is_config_error() {
        let result = StoreConfig::from_lookup(env(&[]));

        match result.unwrap_err() {
            StoreError::Config(msg) => assert!(msg.starts_with("DATABASE_URL")),
            other => panic!("expected Config, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_max_connections_is_config_error() {
        for raw in ["zero", "0", "-3"] {
            let result = StoreConfig::from_lookup(env(&[
                ("DATABASE_URL", "postgres://localhost/bestiary"),
                ("DATABASE_MAX_CONNECTIONS", raw),
            ]));

            assert!(matches!(result, Err(StoreError::Config(_))), "accepted {raw}");
        }
    }
}
