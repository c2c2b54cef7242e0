//! Store error types.

use otherworlds_core::error::DomainError;
use thiserror::Error;

/// Errors raised while configuring or preparing the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required setting is missing or unparsable.
    #[error("configuration error: {0}")]
    Config(String),

    /// The database could not be reached.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying migrations failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Maps a query failure into the domain's infrastructure error.
pub(crate) fn infrastructure(error: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(error.to_string())
}
