//! Flat storage records exchanged with the data-access collaborator.
//!
//! Scalars map one-to-one onto table columns. Collections are carried as
//! JSON text, one column per collection, so a broken column never takes the
//! rest of the record down with it.

use otherworlds_core::repository::StorageRecord;
use uuid::Uuid;

/// Storage shape of a race.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceRecord {
    /// The race identifier.
    pub id: Uuid,
    /// The race name.
    pub name: String,
    /// Category as text; unknown text loads as `unclassified`.
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// Free-text history.
    pub history: String,
    /// Conviction as text; unknown text loads as `neutral`.
    pub conviction: String,
    /// Initiative bonus.
    pub initiative: i32,
    /// Experience-point award.
    pub experience_points: i32,
    /// Morale in combat.
    pub fighting_spirit: i32,
    /// Spawn-rate adjustment for zones.
    pub zone_spawn_modifier: i32,
    /// How easily the race is tamed.
    pub domestication_value: i32,
    /// Owned sub-record, always present.
    pub body_dimension: BodyDimensionRecord,
    /// Optional sub-record.
    pub treasure: Option<TreasureRecord>,
    /// Body parts, as a JSON array.
    pub body_parts_json: String,
    /// Primary stats in dice notation, as a JSON object keyed by stat.
    pub primary_stats_json: String,
    /// Damage multipliers, as a JSON object keyed by damage type.
    pub vulnerabilities_json: String,
    /// Speeds, as a JSON object keyed by movement type.
    pub mobility_json: String,
    /// Social ranks, as a JSON array of strings.
    pub hierarchy_json: String,
    /// Special abilities, as a JSON array.
    pub special_abilities_json: String,
}

impl StorageRecord for RaceRecord {
    fn record_id(&self) -> Uuid {
        self.id
    }
}

/// Body dimension columns of a race row.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDimensionRecord {
    /// Size as text; unknown text loads as `medium`.
    pub race_size: String,
    /// Lightest weight, in kg.
    pub weight_min: f64,
    /// Heaviest weight, in kg.
    pub weight_max: f64,
    /// Shortest length, in cm.
    pub length_min: f64,
    /// Longest length, in cm.
    pub length_max: f64,
    /// Shortest height, in cm.
    pub height_min: f64,
    /// Tallest height, in cm.
    pub height_max: f64,
    /// Maximum age, in years.
    pub max_age: i64,
}

/// Storage shape of a race's treasure.
#[derive(Debug, Clone, PartialEq)]
pub struct TreasureRecord {
    /// The treasure identifier.
    pub id: Uuid,
    /// Coin quantities keyed by hierarchy level, as a JSON object.
    pub coins_json: String,
    /// The currency group the ledger is bound to.
    pub currency_group_id: Uuid,
    /// The bound currency group, when the loader joined it in.
    pub currency_group: Option<CurrencyGroupRecord>,
}

/// Storage shape of a currency group with its denominations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyGroupRecord {
    /// The currency group identifier.
    pub id: Uuid,
    /// The group name.
    pub name: String,
    /// Denominations in stored order.
    pub currencies: Vec<CurrencyRecord>,
}

impl StorageRecord for CurrencyGroupRecord {
    fn record_id(&self) -> Uuid {
        self.id
    }
}

/// Storage shape of one denomination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyRecord {
    /// The denomination identifier.
    pub id: Uuid,
    /// Full denomination name.
    pub name: String,
    /// Abbreviation.
    pub short_name: String,
    /// Rank within the group; must be at least 1.
    pub hierarchy_level: i32,
    /// Base units one coin is worth; must be positive.
    pub exchange_rate: i64,
}
