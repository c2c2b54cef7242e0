//! `PostgreSQL` implementation of the race repository.
//!
//! A race row carries the body dimension columns inline. The optional
//! treasure lives in its own table, and loading a race joins in the bound
//! currency group so the record is complete.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use otherworlds_bestiary::persistence::record::{BodyDimensionRecord, RaceRecord, TreasureRecord};
use otherworlds_core::error::DomainError;
use otherworlds_core::repository::Repository;

use crate::error::infrastructure;
use crate::pg_currency_group_repository::fetch_currency_group;

const SELECT_RACE: &str = "\
    SELECT id, name, category, description, history, conviction, \
           initiative, experience_points, fighting_spirit, zone_spawn_modifier, domestication_value, \
           race_size, weight_min, weight_max, length_min, length_max, height_min, height_max, max_age, \
           body_parts_json, primary_stats_json, vulnerabilities_json, mobility_json, \
           hierarchy_json, special_abilities_json \
    FROM races WHERE id = $1";

const UPSERT_RACE: &str = "\
    INSERT INTO races ( \
        id, name, category, description, history, conviction, \
        initiative, experience_points, fighting_spirit, zone_spawn_modifier, domestication_value, \
        race_size, weight_min, weight_max, length_min, length_max, height_min, height_max, max_age, \
        body_parts_json, primary_stats_json, vulnerabilities_json, mobility_json, \
        hierarchy_json, special_abilities_json \
    ) VALUES ( \
        $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, \
        $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25 \
    ) \
    ON CONFLICT (id) DO UPDATE SET \
        name = EXCLUDED.name, \
        category = EXCLUDED.category, \
        description = EXCLUDED.description, \
        history = EXCLUDED.history, \
        conviction = EXCLUDED.conviction, \
        initiative = EXCLUDED.initiative, \
        experience_points = EXCLUDED.experience_points, \
        fighting_spirit = EXCLUDED.fighting_spirit, \
        zone_spawn_modifier = EXCLUDED.zone_spawn_modifier, \
        domestication_value = EXCLUDED.domestication_value, \
        race_size = EXCLUDED.race_size, \
        weight_min = EXCLUDED.weight_min, \
        weight_max = EXCLUDED.weight_max, \
        length_min = EXCLUDED.length_min, \
        length_max = EXCLUDED.length_max, \
        height_min = EXCLUDED.height_min, \
        height_max = EXCLUDED.height_max, \
        max_age = EXCLUDED.max_age, \
        body_parts_json = EXCLUDED.body_parts_json, \
        primary_stats_json = EXCLUDED.primary_stats_json, \
        vulnerabilities_json = EXCLUDED.vulnerabilities_json, \
        mobility_json = EXCLUDED.mobility_json, \
        hierarchy_json = EXCLUDED.hierarchy_json, \
        special_abilities_json = EXCLUDED.special_abilities_json";

/// PostgreSQL-backed race repository.
#[derive(Debug, Clone)]
pub struct PgRaceRepository {
    pool: PgPool,
}

impl PgRaceRepository {
    /// Creates a new `PgRaceRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_treasure(&self, race_id: Uuid) -> Result<Option<TreasureRecord>, DomainError> {
        let Some(row) = sqlx::query(
            "SELECT id, currency_group_id, coins_json FROM treasures WHERE race_id = $1",
        )
        .bind(race_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infrastructure)?
        else {
            return Ok(None);
        };

        let currency_group_id: Uuid = row.try_get("currency_group_id").map_err(infrastructure)?;
        Ok(Some(TreasureRecord {
            id: row.try_get("id").map_err(infrastructure)?,
            coins_json: row.try_get("coins_json").map_err(infrastructure)?,
            currency_group_id,
            currency_group: fetch_currency_group(&self.pool, currency_group_id).await?,
        }))
    }
}

fn race_from_row(row: &PgRow) -> Result<RaceRecord, sqlx::Error> {
    Ok(RaceRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        description: row.try_get("description")?,
        history: row.try_get("history")?,
        conviction: row.try_get("conviction")?,
        initiative: row.try_get("initiative")?,
        experience_points: row.try_get("experience_points")?,
        fighting_spirit: row.try_get("fighting_spirit")?,
        zone_spawn_modifier: row.try_get("zone_spawn_modifier")?,
        domestication_value: row.try_get("domestication_value")?,
        body_dimension: BodyDimensionRecord {
            race_size: row.try_get("race_size")?,
            weight_min: row.try_get("weight_min")?,
            weight_max: row.try_get("weight_max")?,
            length_min: row.try_get("length_min")?,
            length_max: row.try_get("length_max")?,
            height_min: row.try_get("height_min")?,
            height_max: row.try_get("height_max")?,
            max_age: row.try_get("max_age")?,
        },
        treasure: None,
        body_parts_json: row.try_get("body_parts_json")?,
        primary_stats_json: row.try_get("primary_stats_json")?,
        vulnerabilities_json: row.try_get("vulnerabilities_json")?,
        mobility_json: row.try_get("mobility_json")?,
        hierarchy_json: row.try_get("hierarchy_json")?,
        special_abilities_json: row.try_get("special_abilities_json")?,
    })
}

#[async_trait]
impl Repository<RaceRecord> for PgRaceRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RaceRecord>, DomainError> {
        let Some(row) = sqlx::query(SELECT_RACE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(infrastructure)?
        else {
            return Ok(None);
        };

        let mut record = race_from_row(&row).map_err(infrastructure)?;
        record.treasure = self.fetch_treasure(id).await?;
        Ok(Some(record))
    }

    async fn save(&self, record: &RaceRecord) -> Result<(), DomainError> {
        let dims = &record.body_dimension;
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        sqlx::query(UPSERT_RACE)
            .bind(record.id)
            .bind(&record.name)
            .bind(&record.category)
            .bind(&record.description)
            .bind(&record.history)
            .bind(&record.conviction)
            .bind(record.initiative)
            .bind(record.experience_points)
            .bind(record.fighting_spirit)
            .bind(record.zone_spawn_modifier)
            .bind(record.domestication_value)
            .bind(&dims.race_size)
            .bind(dims.weight_min)
            .bind(dims.weight_max)
            .bind(dims.length_min)
            .bind(dims.length_max)
            .bind(dims.height_min)
            .bind(dims.height_max)
            .bind(dims.max_age)
            .bind(&record.body_parts_json)
            .bind(&record.primary_stats_json)
            .bind(&record.vulnerabilities_json)
            .bind(&record.mobility_json)
            .bind(&record.hierarchy_json)
            .bind(&record.special_abilities_json)
            .execute(&mut *tx)
            .await
            .map_err(infrastructure)?;

        sqlx::query("DELETE FROM treasures WHERE race_id = $1")
            .bind(record.id)
            .execute(&mut *tx)
            .await
            .map_err(infrastructure)?;

        // The currency group is owned by its own repository; only the
        // binding and the ledger are written here.
        if let Some(treasure) = &record.treasure {
            sqlx::query(
                "INSERT INTO treasures (id, race_id, currency_group_id, coins_json) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(treasure.id)
            .bind(record.id)
            .bind(treasure.currency_group_id)
            .bind(&treasure.coins_json)
            .execute(&mut *tx)
            .await
            .map_err(infrastructure)?;
        }

        tx.commit().await.map_err(infrastructure)?;
        tracing::debug!(race_id = %record.id, "saved race");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM races WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(infrastructure)?;
        Ok(result.rows_affected() > 0)
    }
}
