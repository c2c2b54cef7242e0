//! Query handlers for the Bestiary context.
//!
//! Queries load a record, rebuild the domain object, and return read-only
//! view DTOs.

use std::collections::BTreeMap;

use otherworlds_core::error::DomainError;
use otherworlds_core::repository::Repository;
use otherworlds_core::rng::DeterministicRng;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers::load_currency_group;
use crate::domain::currency::HierarchyLevel;
use crate::domain::taxonomy::BodyStat;
use crate::persistence::mapper::{currency_group_from_record, race_from_record};
use crate::persistence::record::{CurrencyGroupRecord, RaceRecord};

/// Read-only view of a race.
#[derive(Debug, Serialize)]
pub struct RaceView {
    /// The race identifier.
    pub race_id: Uuid,
    /// The race name.
    pub name: String,
    /// The race category, as text.
    pub category: String,
    /// The moral leaning, as text.
    pub conviction: String,
    /// Free-text description.
    pub description: String,
    /// Free-text history.
    pub history: String,
    /// The size category, as text.
    pub size: String,
    /// Initiative bonus.
    pub initiative: i32,
    /// Experience points awarded for defeating one.
    pub experience_points: i32,
    /// Morale in combat.
    pub fighting_spirit: i32,
    /// Body part names, in anatomical order.
    pub body_parts: Vec<String>,
    /// Σ armor × quantity over all defended parts.
    pub natural_armor: i64,
    /// The treasure, when the race has one and its currency group loaded.
    pub treasure: Option<TreasureView>,
}

/// Read-only view of a race's treasure.
#[derive(Debug, Serialize)]
pub struct TreasureView {
    /// The currency group the ledger is bound to.
    pub currency_group_id: Uuid,
    /// Coin quantities keyed by hierarchy level.
    pub coins: BTreeMap<HierarchyLevel, u64>,
    /// Total worth in base units.
    pub total_value: u128,
    /// Human-readable ledger, e.g. `2 gp, 5 cp`.
    pub summary: String,
}

/// Read-only view of a currency group.
#[derive(Debug, Serialize)]
pub struct CurrencyGroupView {
    /// The currency group identifier.
    pub currency_group_id: Uuid,
    /// The group name.
    pub name: String,
    /// Denominations ordered from highest value (level 1) down.
    pub currencies: Vec<CurrencyView>,
}

/// Read-only view of one denomination.
#[derive(Debug, Serialize)]
pub struct CurrencyView {
    /// Full denomination name.
    pub name: String,
    /// Abbreviation used when listing coins.
    pub short_name: String,
    /// Rank within the group; 1 is the most valuable.
    pub hierarchy_level: HierarchyLevel,
    /// Base units one coin is worth.
    pub exchange_rate: u64,
}

/// One roll of every primary stat a race defines.
#[derive(Debug, Serialize)]
pub struct RolledStatsView {
    /// The race identifier.
    pub race_id: Uuid,
    /// The rolled value per stat; stats the race lacks are absent.
    pub stats: BTreeMap<BodyStat, i64>,
}

/// Retrieves a race by its ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no record exists for the ID,
/// or the mapper's error if the record cannot be rebuilt.
pub async fn get_race_by_id(
    race_id: Uuid,
    races: &dyn Repository<RaceRecord>,
) -> Result<RaceView, DomainError> {
    let record = races
        .find_by_id(race_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(race_id))?;
    let race = race_from_record(&record)?;
    let group = record
        .treasure
        .as_ref()
        .and_then(|treasure| treasure.currency_group.as_ref())
        .and_then(|group| currency_group_from_record(group).ok());

    let treasure = match (race.treasure(), group.as_ref()) {
        (Some(treasure), Some(group)) => Some(TreasureView {
            currency_group_id: treasure.currency_group_id(),
            coins: treasure.coins().clone(),
            total_value: treasure.total_value_in_base_units(group)?,
            summary: treasure.display_with(group).to_string(),
        }),
        _ => None,
    };

    Ok(RaceView {
        race_id,
        name: race.name().to_owned(),
        category: race.category().to_string(),
        conviction: race.conviction().to_string(),
        description: race.description().to_owned(),
        history: race.history().to_owned(),
        size: race.body_dimension().size().to_string(),
        initiative: race.initiative(),
        experience_points: race.experience_points(),
        fighting_spirit: race.fighting_spirit(),
        body_parts: race
            .body_parts()
            .iter()
            .map(|part| part.name().to_owned())
            .collect(),
        natural_armor: race.natural_armor(),
        treasure,
    })
}

/// Rolls every primary stat of a race, e.g. to stat out one creature.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no record exists for the ID,
/// or the mapper's error if the record cannot be rebuilt.
pub async fn roll_race_stats(
    race_id: Uuid,
    races: &dyn Repository<RaceRecord>,
    rng: &mut dyn DeterministicRng,
) -> Result<RolledStatsView, DomainError> {
    let record = races
        .find_by_id(race_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(race_id))?;
    let race = race_from_record(&record)?;

    let mut stats = BTreeMap::new();
    for stat in race.primary_stats().keys().copied() {
        if let Some(value) = race.roll_primary_stat(stat, rng) {
            stats.insert(stat, value);
        }
    }
    Ok(RolledStatsView { race_id, stats })
}

/// Retrieves a currency group by its ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no record exists for the ID.
pub async fn get_currency_group_by_id(
    currency_group_id: Uuid,
    groups: &dyn Repository<CurrencyGroupRecord>,
) -> Result<CurrencyGroupView, DomainError> {
    let group = load_currency_group(currency_group_id, groups).await?;
    Ok(CurrencyGroupView {
        currency_group_id,
        name: group.name().to_owned(),
        currencies: group
            .currencies_by_rank()
            .into_iter()
            .map(|currency| CurrencyView {
                name: currency.name().to_owned(),
                short_name: currency.short_name().to_owned(),
                hierarchy_level: currency.hierarchy_level(),
                exchange_rate: currency.exchange_rate(),
            })
            .collect(),
    })
}
