//! Conversion between the `Race` object graph and its storage record.
//!
//! Loading is lenient column by column: a JSON column that is empty, is not
//! valid JSON, or holds content the domain rejects is dropped (with a
//! warning) and the race loads without it. Scalars and the body dimension
//! are strict, since a race cannot be built without them.

use std::collections::BTreeMap;
use std::str::FromStr;

use otherworlds_core::error::DomainError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::anatomy::{BodyDimension, BodyPart, MeasureRange};
use crate::domain::builder::RaceAggregateBuilder;
use crate::domain::currency::{CurrencyGroup, SingleCurrency};
use crate::domain::dice::ValueRange;
use crate::domain::race::{Race, SpecialAbility};
use crate::domain::taxonomy::{BodyStat, DamageType, MovementType, RaceSize};
use crate::domain::treasure::{CoinLedger, Treasure};

use super::record::{
    BodyDimensionRecord, CurrencyGroupRecord, CurrencyRecord, RaceRecord, TreasureRecord,
};
use super::stored::{
    BodyPartStored, PrimaryStatsStored, SpecialAbilityStored, primary_stats_from_stored,
    primary_stats_to_stored,
};

const BODY_PARTS: &str = "body_parts_json";
const PRIMARY_STATS: &str = "primary_stats_json";
const VULNERABILITIES: &str = "vulnerabilities_json";
const MOBILITY: &str = "mobility_json";
const HIERARCHY: &str = "hierarchy_json";
const SPECIAL_ABILITIES: &str = "special_abilities_json";
const COINS: &str = "coins_json";

// ---------------------------------------------------------------------------
// Storage -> domain
// ---------------------------------------------------------------------------

/// Rebuilds a race from its storage record.
///
/// The record's identity is kept. Treasure is attached only when the record
/// carries both the treasure sub-record and its currency group.
///
/// # Errors
///
/// Returns `DomainError::Decode` if the body dimension columns are out of
/// range, and the builder's `Validation`/`State` errors if a scalar breaks a
/// race invariant (e.g. a blank name or negative initiative).
pub fn race_from_record(record: &RaceRecord) -> Result<Race, DomainError> {
    let mut builder = RaceAggregateBuilder::new();
    builder
        .with_id(record.id)
        .with_name(record.name.clone())
        .with_category(parse_or_neutral("category", &record.category))
        .with_conviction(parse_or_neutral("conviction", &record.conviction))
        .with_description(record.description.clone())
        .with_history(record.history.clone())
        .with_zone_spawn_modifier(record.zone_spawn_modifier)
        .with_domestication_value(record.domestication_value)
        .with_body_dimensions(body_dimension_from_record(&record.body_dimension)?)
        .with_initiative(record.initiative)?
        .with_experience_points(record.experience_points)?
        .with_fighting_spirit(record.fighting_spirit)?;

    if let Some(parts) = decode_body_parts(&record.body_parts_json) {
        builder.add_body_parts(parts);
    }
    if let Some(stats) = decode_primary_stats(&record.primary_stats_json) {
        builder.add_primary_stats(stats);
    }
    if let Some(abilities) = decode_special_abilities(&record.special_abilities_json) {
        builder.add_special_abilities(abilities);
    }
    if let Some(vulnerabilities) = decode_vulnerabilities(&record.vulnerabilities_json)
        && let Err(e) = builder.add_vulnerabilities(vulnerabilities)
    {
        discard(VULNERABILITIES, &e);
    }
    if let Some(mobility) = decode_mobility(&record.mobility_json)
        && let Err(e) = builder.add_mobilities(mobility)
    {
        discard(MOBILITY, &e);
    }
    if let Some(ranks) = decode_hierarchy(&record.hierarchy_json)
        && let Err(e) = builder.add_hierarchy_entries(ranks)
    {
        discard(HIERARCHY, &e);
    }

    builder.with_treasure(record.treasure.as_ref().and_then(treasure_from_record));
    builder.build()
}

/// Rebuilds a currency group from its storage record.
///
/// # Errors
///
/// Returns `DomainError::Decode` if a level or rate column is out of range,
/// and the group's own errors if a name is blank or two denominations share
/// a level.
pub fn currency_group_from_record(
    record: &CurrencyGroupRecord,
) -> Result<CurrencyGroup, DomainError> {
    let currencies = record
        .currencies
        .iter()
        .map(currency_from_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CurrencyGroup::new(record.name.clone(), currencies)?.with_id(record.id))
}

fn currency_from_record(record: &CurrencyRecord) -> Result<SingleCurrency, DomainError> {
    let level = u32::try_from(record.hierarchy_level).map_err(|e| DomainError::Decode {
        column: "hierarchy_level",
        reason: e.to_string(),
    })?;
    let rate = u64::try_from(record.exchange_rate).map_err(|e| DomainError::Decode {
        column: "exchange_rate",
        reason: e.to_string(),
    })?;
    Ok(
        SingleCurrency::new(record.name.clone(), record.short_name.clone(), level, rate)?
            .with_id(record.id),
    )
}

fn body_dimension_from_record(record: &BodyDimensionRecord) -> Result<BodyDimension, DomainError> {
    let decode_error = |reason: String| DomainError::Decode {
        column: "body_dimension",
        reason,
    };
    let max_age = u32::try_from(record.max_age).map_err(|e| decode_error(e.to_string()))?;
    BodyDimension::from_pairs(
        RaceSize::parse_or_default(&record.race_size),
        (record.weight_min, record.weight_max),
        (record.length_min, record.length_max),
        (record.height_min, record.height_max),
        max_age,
    )
    .map_err(|e| decode_error(e.to_string()))
}

fn treasure_from_record(record: &TreasureRecord) -> Option<Treasure> {
    let group_record = record.currency_group.as_ref()?;
    if group_record.id != record.currency_group_id {
        warn!(
            treasure_id = %record.id,
            currency_group_id = %record.currency_group_id,
            joined_group_id = %group_record.id,
            "joined currency group does not match the treasure binding, treasure dropped"
        );
        return None;
    }
    let group = match currency_group_from_record(group_record) {
        Ok(group) => group,
        Err(e) => {
            warn!(treasure_id = %record.id, error = %e, "currency group rejected, treasure dropped");
            return None;
        }
    };

    let mut treasure = Treasure::new(&group).with_id(record.id);
    if let Some(coins) = decode_coins(&record.coins_json) {
        // Bound to `group` a few lines up, so this cannot fail.
        if let Err(e) = treasure.set_coin_quantities(&group, coins) {
            discard(COINS, &e);
        }
    }
    Some(treasure)
}

fn decode_body_parts(text: &str) -> Option<Vec<BodyPart>> {
    decode_column::<Vec<BodyPartStored>>(BODY_PARTS, text)?
        .into_iter()
        .map(BodyPart::try_from)
        .collect::<Result<_, _>>()
        .map_err(|e| discard(BODY_PARTS, &e))
        .ok()
}

fn decode_primary_stats(text: &str) -> Option<BTreeMap<BodyStat, ValueRange>> {
    let stored = decode_column::<PrimaryStatsStored>(PRIMARY_STATS, text)?;
    primary_stats_from_stored(stored)
        .map_err(|e| discard(PRIMARY_STATS, &e))
        .ok()
}

fn decode_special_abilities(text: &str) -> Option<Vec<SpecialAbility>> {
    decode_column::<Vec<SpecialAbilityStored>>(SPECIAL_ABILITIES, text)?
        .into_iter()
        .map(SpecialAbility::try_from)
        .collect::<Result<_, _>>()
        .map_err(|e| discard(SPECIAL_ABILITIES, &e))
        .ok()
}

fn decode_vulnerabilities(text: &str) -> Option<BTreeMap<DamageType, f64>> {
    decode_column(VULNERABILITIES, text)
}

fn decode_mobility(text: &str) -> Option<BTreeMap<MovementType, i32>> {
    decode_column(MOBILITY, text)
}

fn decode_hierarchy(text: &str) -> Option<Vec<String>> {
    decode_column(HIERARCHY, text)
}

fn decode_coins(text: &str) -> Option<CoinLedger> {
    decode_column(COINS, text)
}

/// Parses one JSON column. Empty text is silently absent; malformed text is
/// absent with a warning.
fn decode_column<T: DeserializeOwned>(column: &'static str, text: &str) -> Option<T> {
    if text.trim().is_empty() {
        return None;
    }
    serde_json::from_str(text)
        .map_err(|e| {
            discard(
                column,
                &DomainError::Decode {
                    column,
                    reason: e.to_string(),
                },
            );
        })
        .ok()
}

fn discard(column: &'static str, error: &DomainError) {
    warn!(column, error = %error, "discarding undecodable race column");
}

/// Parses an enumeration column, falling back to the neutral variant for
/// unknown text.
fn parse_or_neutral<T>(column: &'static str, text: &str) -> T
where
    T: FromStr<Err = DomainError> + Default,
{
    text.parse().unwrap_or_else(|e| {
        if !text.trim().is_empty() {
            discard(column, &e);
        }
        T::default()
    })
}

// ---------------------------------------------------------------------------
// Domain -> storage
// ---------------------------------------------------------------------------

/// Flattens a race into its storage record.
///
/// When `currency_group` is the group the race's treasure is bound to, the
/// group is nested into the treasure sub-record; any other group is ignored.
///
/// # Errors
///
/// Returns `DomainError::Validation` if a nested exchange rate does not fit
/// the storage column, and `DomainError::Infrastructure` if a collection
/// cannot be written as JSON.
pub fn race_to_record(
    race: &Race,
    currency_group: Option<&CurrencyGroup>,
) -> Result<RaceRecord, DomainError> {
    let treasure = race
        .treasure()
        .map(|treasure| treasure_to_record(treasure, currency_group))
        .transpose()?;

    Ok(RaceRecord {
        id: race.id(),
        name: race.name().to_owned(),
        category: race.category().as_str().to_owned(),
        description: race.description().to_owned(),
        history: race.history().to_owned(),
        conviction: race.conviction().as_str().to_owned(),
        initiative: race.initiative(),
        experience_points: race.experience_points(),
        fighting_spirit: race.fighting_spirit(),
        zone_spawn_modifier: race.zone_spawn_modifier(),
        domestication_value: race.domestication_value(),
        body_dimension: body_dimension_to_record(race.body_dimension()),
        treasure,
        body_parts_json: encode(
            BODY_PARTS,
            &race
                .body_parts()
                .iter()
                .map(BodyPartStored::from)
                .collect::<Vec<_>>(),
        )?,
        primary_stats_json: encode(
            PRIMARY_STATS,
            &primary_stats_to_stored(race.primary_stats()),
        )?,
        vulnerabilities_json: encode(VULNERABILITIES, race.vulnerabilities())?,
        mobility_json: encode(MOBILITY, race.mobility())?,
        hierarchy_json: encode(HIERARCHY, race.hierarchy())?,
        special_abilities_json: encode(
            SPECIAL_ABILITIES,
            &race
                .special_abilities()
                .iter()
                .map(SpecialAbilityStored::from)
                .collect::<Vec<_>>(),
        )?,
    })
}

/// Flattens a currency group into its storage record.
///
/// # Errors
///
/// Returns `DomainError::Validation` if a hierarchy level or exchange rate
/// does not fit its storage column.
pub fn currency_group_to_record(group: &CurrencyGroup) -> Result<CurrencyGroupRecord, DomainError> {
    let currencies = group
        .currencies()
        .iter()
        .map(currency_to_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CurrencyGroupRecord {
        id: group.id(),
        name: group.name().to_owned(),
        currencies,
    })
}

fn currency_to_record(currency: &SingleCurrency) -> Result<CurrencyRecord, DomainError> {
    let too_large = |what: &str| {
        DomainError::validation(format!(
            "{what} of currency {} does not fit the storage column",
            currency.name()
        ))
    };
    Ok(CurrencyRecord {
        id: currency.id(),
        name: currency.name().to_owned(),
        short_name: currency.short_name().to_owned(),
        hierarchy_level: i32::try_from(currency.hierarchy_level())
            .map_err(|_| too_large("hierarchy level"))?,
        exchange_rate: i64::try_from(currency.exchange_rate())
            .map_err(|_| too_large("exchange rate"))?,
    })
}

fn treasure_to_record(
    treasure: &Treasure,
    currency_group: Option<&CurrencyGroup>,
) -> Result<TreasureRecord, DomainError> {
    let currency_group = currency_group
        .filter(|group| group.id() == treasure.currency_group_id())
        .map(currency_group_to_record)
        .transpose()?;
    Ok(TreasureRecord {
        id: treasure.id(),
        coins_json: encode(COINS, treasure.coins())?,
        currency_group_id: treasure.currency_group_id(),
        currency_group,
    })
}

fn body_dimension_to_record(dimension: &BodyDimension) -> BodyDimensionRecord {
    let (weight, length, height): (MeasureRange, MeasureRange, MeasureRange) = (
        dimension.weight_kg(),
        dimension.length_cm(),
        dimension.height_cm(),
    );
    BodyDimensionRecord {
        race_size: dimension.size().as_str().to_owned(),
        weight_min: weight.min(),
        weight_max: weight.max(),
        length_min: length.min(),
        length_max: length.max(),
        height_min: height.min(),
        height_max: height.max(),
        max_age: i64::from(dimension.max_age()),
    }
}

fn encode<T: Serialize + ?Sized>(column: &'static str, value: &T) -> Result<String, DomainError> {
    serde_json::to_string(value).map_err(|e| {
        DomainError::Infrastructure(format!("could not encode column {column}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::anatomy::{BodyPartAttack, BodyPartDefense};
    use crate::domain::dice::Dice;
    use crate::domain::taxonomy::{BodyPartCategory, Conviction, RaceCategory};

    fn scrip() -> CurrencyGroup {
        CurrencyGroup::new(
            "Guild Scrip",
            vec![
                SingleCurrency::new("Crown", "cr", 1, 100).unwrap(),
                SingleCurrency::new("Mark", "mk", 2, 10).unwrap(),
                SingleCurrency::new("Penny", "pn", 3, 1).unwrap(),
            ],
        )
        .unwrap()
    }

    fn wyvern(group: &CurrencyGroup) -> Race {
        let mut sting = BodyPart::new("Sting", BodyPartCategory::Tail, 1).unwrap();
        let mut attack = BodyPartAttack::new("2d4+1".parse().unwrap());
        attack
            .set_damage_type(DamageType::Poison)
            .set_initiative(2)
            .unwrap();
        sting.set_attack(Some(attack)).set_function("Injects venom");
        let mut scales = BodyPart::new("Scales", BodyPartCategory::Torso, 1).unwrap();
        let mut defense = BodyPartDefense::new(4).unwrap();
        defense.set_protected(true);
        scales.set_defense(Some(defense));

        let mut treasure = Treasure::new(group);
        treasure.add_coins(group, 1, 2).unwrap();
        treasure.add_coins(group, 3, 17).unwrap();

        let mut builder = RaceAggregateBuilder::new();
        builder
            .with_name("Wyvern")
            .with_category(RaceCategory::Dragon)
            .with_conviction(Conviction::Evil)
            .with_description("A lesser drake")
            .with_history("Bred in the northern crags")
            .with_zone_spawn_modifier(-2)
            .with_domestication_value(3)
            .with_body_dimensions(
                BodyDimension::from_pairs(
                    RaceSize::Large,
                    (300.0, 600.0),
                    (500.0, 900.0),
                    (150.0, 250.0),
                    120,
                )
                .unwrap(),
            )
            .with_treasure(Some(treasure))
            .add_body_parts([sting, scales])
            .add_primary_stat(BodyStat::Strength, Dice::new(4, 6, 0).unwrap().into())
            .add_special_ability(SpecialAbility::new("Dive", "Strikes from above").unwrap())
            .with_initiative(5)
            .unwrap()
            .with_experience_points(450)
            .unwrap()
            .with_fighting_spirit(7)
            .unwrap()
            .add_vulnerabilities([(DamageType::Cold, 1.5), (DamageType::Poison, 0.0)])
            .unwrap()
            .add_mobilities([(MovementType::Fly, 20), (MovementType::Walk, 6)])
            .unwrap()
            .add_hierarchy_entries(vec!["Matriarch".to_owned(), "Hatchling".to_owned()])
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_round_trip_reproduces_the_race() {
        let group = scrip();
        let race = wyvern(&group);

        let record = race_to_record(&race, Some(&group)).unwrap();
        let loaded = race_from_record(&record).unwrap();

        assert_eq!(loaded, race);
    }

    #[test]
    fn test_round_trip_keeps_coin_quantities_and_total() {
        let group = scrip();
        let race = wyvern(&group);

        let record = race_to_record(&race, Some(&group)).unwrap();
        let loaded = race_from_record(&record).unwrap();

        let treasure = loaded.treasure().unwrap();
        assert_eq!(treasure.coin_quantity(1), 2);
        assert_eq!(treasure.coin_quantity(2), 0);
        assert_eq!(treasure.coin_quantity(3), 17);
        assert_eq!(treasure.total_value_in_base_units(&group).unwrap(), 217);
    }

    #[test]
    fn test_scalars_are_flattened_as_text() {
        let group = scrip();

        let record = race_to_record(&wyvern(&group), Some(&group)).unwrap();

        assert_eq!(record.category, "dragon");
        assert_eq!(record.conviction, "evil");
        assert_eq!(record.body_dimension.race_size, "large");
        assert_eq!(record.body_dimension.max_age, 120);
        assert_eq!(record.hierarchy_json, r#"["Matriarch","Hatchling"]"#);
        assert_eq!(record.mobility_json, r#"{"walk":6,"fly":20}"#);
    }

    #[test]
    fn test_empty_collections_encode_as_empty_json() {
        let mut builder = RaceAggregateBuilder::new();
        builder
            .with_name("Slime")
            .with_body_dimensions(BodyDimension::from_pairs(
                RaceSize::Tiny,
                (0.1, 0.5),
                (5.0, 10.0),
                (2.0, 4.0),
                5,
            )
            .unwrap());
        let race = builder.build().unwrap();

        let record = race_to_record(&race, None).unwrap();

        assert_eq!(record.body_parts_json, "[]");
        assert_eq!(record.hierarchy_json, "[]");
        assert_eq!(record.special_abilities_json, "[]");
        assert_eq!(record.primary_stats_json, "{}");
        assert_eq!(record.vulnerabilities_json, "{}");
        assert_eq!(record.mobility_json, "{}");
        assert!(record.treasure.is_none());
    }

    #[test]
    fn test_malformed_vulnerabilities_column_loads_without_vulnerabilities() {
        let group = scrip();
        let race = wyvern(&group);
        let mut record = race_to_record(&race, Some(&group)).unwrap();
        record.vulnerabilities_json = "{not json".to_owned();

        let loaded = race_from_record(&record).unwrap();

        assert!(loaded.vulnerabilities().is_empty());
        assert_eq!(loaded.body_parts().len(), 2);
        assert_eq!(loaded.mobility().len(), 2);
        assert_eq!(loaded.name(), "Wyvern");
    }

    #[test]
    fn test_oversized_stat_dice_drop_only_the_stats_column() {
        let group = scrip();
        let mut record = race_to_record(&wyvern(&group), Some(&group)).unwrap();
        record.primary_stats_json = r#"{"strength":"4294967295d4294967295"}"#.to_owned();

        let loaded = race_from_record(&record).unwrap();

        assert!(loaded.primary_stats().is_empty());
        assert_eq!(loaded.body_parts().len(), 2);
    }

    #[test]
    fn test_each_json_column_fails_independently() {
        let group = scrip();
        let mut record = race_to_record(&wyvern(&group), Some(&group)).unwrap();
        record.body_parts_json = String::new();
        record.primary_stats_json = r#"{"strength":"many dice"}"#.to_owned();
        record.mobility_json = r#"{"fly":-3}"#.to_owned();
        record.hierarchy_json = "42".to_owned();

        let loaded = race_from_record(&record).unwrap();

        assert!(loaded.body_parts().is_empty());
        assert!(loaded.primary_stats().is_empty());
        assert!(loaded.mobility().is_empty());
        assert!(loaded.hierarchy().is_empty());
        assert_eq!(loaded.vulnerabilities().len(), 2);
        assert_eq!(loaded.special_abilities().len(), 1);
    }

    #[test]
    fn test_unknown_enumeration_text_falls_back() {
        let group = scrip();
        let mut record = race_to_record(&wyvern(&group), Some(&group)).unwrap();
        record.category = "kaiju".to_owned();
        record.conviction = String::new();
        record.body_dimension.race_size = "colossal".to_owned();

        let loaded = race_from_record(&record).unwrap();

        assert_eq!(loaded.category(), RaceCategory::Unclassified);
        assert_eq!(loaded.conviction(), Conviction::Neutral);
        assert_eq!(loaded.body_dimension().size(), RaceSize::Medium);
    }

    #[test]
    fn test_treasure_needs_its_currency_group() {
        let group = scrip();
        let race = wyvern(&group);

        let without_group = race_to_record(&race, None).unwrap();
        let loaded = race_from_record(&without_group).unwrap();

        assert!(without_group.treasure.is_some());
        assert!(loaded.treasure().is_none());
    }

    #[test]
    fn test_non_matching_group_is_not_nested() {
        let group = scrip();
        let other = scrip();

        let record = race_to_record(&wyvern(&group), Some(&other)).unwrap();

        let treasure = record.treasure.unwrap();
        assert_eq!(treasure.currency_group_id, group.id());
        assert!(treasure.currency_group.is_none());
    }

    #[test]
    fn test_malformed_coins_load_as_zero_balances() {
        let group = scrip();
        let mut record = race_to_record(&wyvern(&group), Some(&group)).unwrap();
        record.treasure.as_mut().unwrap().coins_json = "[1, 2".to_owned();

        let loaded = race_from_record(&record).unwrap();

        let treasure = loaded.treasure().unwrap();
        assert!(treasure.is_empty());
        assert_eq!(treasure.coins().len(), 3);
    }

    #[test]
    fn test_inverted_body_dimension_is_decode_error() {
        let group = scrip();
        let mut record = race_to_record(&wyvern(&group), Some(&group)).unwrap();
        record.body_dimension.height_min = 300.0;

        match race_from_record(&record).unwrap_err() {
            DomainError::Decode { column, reason } => {
                assert_eq!(column, "body_dimension");
                assert!(reason.contains("height:"));
            }
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_name_in_record_fails_the_load() {
        let group = scrip();
        let mut record = race_to_record(&wyvern(&group), Some(&group)).unwrap();
        record.name = String::new();

        assert!(matches!(
            race_from_record(&record),
            Err(DomainError::State(_))
        ));
    }

    #[test]
    fn test_currency_group_round_trip() {
        let group = scrip();

        let record = currency_group_to_record(&group).unwrap();
        let loaded = currency_group_from_record(&record).unwrap();

        assert_eq!(loaded, group);
        assert_eq!(record.currencies[1].exchange_rate, 10);
    }

    #[test]
    fn test_currency_group_record_with_duplicate_levels_is_rejected() {
        let mut record = currency_group_to_record(&scrip()).unwrap();
        record.currencies[2].hierarchy_level = 1;

        assert!(matches!(
            currency_group_from_record(&record),
            Err(DomainError::State(_))
        ));
    }

    #[test]
    fn test_negative_exchange_rate_is_decode_error() {
        let mut record = currency_group_to_record(&scrip()).unwrap();
        record.currencies[0].exchange_rate = -5;

        match currency_group_from_record(&record).unwrap_err() {
            DomainError::Decode { column, .. } => assert_eq!(column, "exchange_rate"),
            other => panic!("expected Decode, got {other:?}"),
        }
    }
}
