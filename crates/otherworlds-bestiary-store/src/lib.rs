//! Otherworlds Bestiary Store — `PostgreSQL` persistence for races and
//! currency groups.

pub mod config;
pub mod error;
pub mod pg_currency_group_repository;
pub mod pg_race_repository;

/// Migrations embedded from the workspace `migrations/` directory.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
