//! `PostgreSQL` implementation of the currency group repository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use otherworlds_bestiary::persistence::record::{CurrencyGroupRecord, CurrencyRecord};
use otherworlds_core::error::DomainError;
use otherworlds_core::repository::Repository;

use crate::error::infrastructure;

/// PostgreSQL-backed currency group repository.
#[derive(Debug, Clone)]
pub struct PgCurrencyGroupRepository {
    pool: PgPool,
}

impl PgCurrencyGroupRepository {
    /// Creates a new `PgCurrencyGroupRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Loads a currency group with its denominations in insertion order.
pub(crate) async fn fetch_currency_group(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<CurrencyGroupRecord>, DomainError> {
    let Some(group_row) = sqlx::query("SELECT id, name FROM currency_groups WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(infrastructure)?
    else {
        return Ok(None);
    };

    let currencies = sqlx::query(
        "SELECT id, name, short_name, hierarchy_level, exchange_rate \
         FROM currencies WHERE currency_group_id = $1 ORDER BY position",
    )
    .bind(id)
    .fetch_all(pool)
    .await
    .map_err(infrastructure)?
    .iter()
    .map(|row| -> Result<CurrencyRecord, sqlx::Error> {
        Ok(CurrencyRecord {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            short_name: row.try_get("short_name")?,
            hierarchy_level: row.try_get("hierarchy_level")?,
            exchange_rate: row.try_get("exchange_rate")?,
        })
    })
    .collect::<Result<Vec<_>, _>>()
    .map_err(infrastructure)?;

    Ok(Some(CurrencyGroupRecord {
        id: group_row.try_get("id").map_err(infrastructure)?,
        name: group_row.try_get("name").map_err(infrastructure)?,
        currencies,
    }))
}

async fn write_currency_group(
    tx: &mut Transaction<'_, Postgres>,
    record: &CurrencyGroupRecord,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO currency_groups (id, name) VALUES ($1, $2) \
         ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name",
    )
    .bind(record.id)
    .bind(&record.name)
    .execute(&mut **tx)
    .await?;

    sqlx::query("DELETE FROM currencies WHERE currency_group_id = $1")
        .bind(record.id)
        .execute(&mut **tx)
        .await?;

    for (position, currency) in (0_i32..).zip(&record.currencies) {
        sqlx::query(
            "INSERT INTO currencies \
             (id, currency_group_id, position, name, short_name, hierarchy_level, exchange_rate) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(currency.id)
        .bind(record.id)
        .bind(position)
        .bind(&currency.name)
        .bind(&currency.short_name)
        .bind(currency.hierarchy_level)
        .bind(currency.exchange_rate)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl Repository<CurrencyGroupRecord> for PgCurrencyGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CurrencyGroupRecord>, DomainError> {
        fetch_currency_group(&self.pool, id).await
    }

    async fn save(&self, record: &CurrencyGroupRecord) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;
        write_currency_group(&mut tx, record)
            .await
            .map_err(infrastructure)?;
        tx.commit().await.map_err(infrastructure)?;
        tracing::debug!(currency_group_id = %record.id, "saved currency group");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM currency_groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(infrastructure)?;
        Ok(result.rows_affected() > 0)
    }
}
