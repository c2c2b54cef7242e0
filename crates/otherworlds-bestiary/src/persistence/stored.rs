//! Serde shapes for the JSON-text columns of a race record.
//!
//! Domain types stay free of serde. Each stored shape converts from the
//! domain type infallibly and back with `TryFrom`, which re-runs the domain
//! validation.

use std::collections::BTreeMap;

use otherworlds_core::error::DomainError;
use serde::{Deserialize, Serialize};

use crate::domain::anatomy::{BodyPart, BodyPartAttack, BodyPartDefense};
use crate::domain::dice::{Dice, ValueRange};
use crate::domain::race::SpecialAbility;
use crate::domain::taxonomy::{BodyPartCategory, BodyStat, DamageType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct BodyPartStored {
    name: String,
    #[serde(default)]
    category: BodyPartCategory,
    quantity: u32,
    #[serde(default)]
    function: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attack: Option<AttackStored>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    defense: Option<DefenseStored>,
}

impl From<&BodyPart> for BodyPartStored {
    fn from(part: &BodyPart) -> Self {
        Self {
            name: part.name().to_owned(),
            category: part.category(),
            quantity: part.quantity(),
            function: part.function().to_owned(),
            attack: part.attack().map(AttackStored::from),
            defense: part.defense().map(DefenseStored::from),
        }
    }
}

impl TryFrom<BodyPartStored> for BodyPart {
    type Error = DomainError;

    fn try_from(value: BodyPartStored) -> Result<Self, Self::Error> {
        let mut part = BodyPart::new(value.name, value.category, value.quantity)?;
        part.set_function(value.function);
        if let Some(attack) = value.attack {
            part.set_attack(Some(attack.try_into()?));
        }
        if let Some(defense) = value.defense {
            part.set_defense(Some(defense.try_into()?));
        }
        Ok(part)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AttackStored {
    /// Dice notation, e.g. `1d6+1`.
    damage: String,
    #[serde(default)]
    damage_type: DamageType,
    initiative: i32,
    #[serde(default)]
    combinable: bool,
}

impl From<&BodyPartAttack> for AttackStored {
    fn from(attack: &BodyPartAttack) -> Self {
        Self {
            damage: attack.damage().to_string(),
            damage_type: attack.damage_type(),
            initiative: attack.initiative(),
            combinable: attack.is_combinable(),
        }
    }
}

impl TryFrom<AttackStored> for BodyPartAttack {
    type Error = DomainError;

    fn try_from(value: AttackStored) -> Result<Self, Self::Error> {
        let mut attack = BodyPartAttack::new(value.damage.parse::<Dice>()?);
        attack
            .set_damage_type(value.damage_type)
            .set_combinable(value.combinable)
            .set_initiative(value.initiative)?;
        Ok(attack)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DefenseStored {
    armor_value: i32,
    #[serde(default)]
    vital: bool,
    #[serde(default)]
    protected: bool,
}

impl From<&BodyPartDefense> for DefenseStored {
    fn from(defense: &BodyPartDefense) -> Self {
        Self {
            armor_value: defense.armor_value(),
            vital: defense.is_vital(),
            protected: defense.is_protected(),
        }
    }
}

impl TryFrom<DefenseStored> for BodyPartDefense {
    type Error = DomainError;

    fn try_from(value: DefenseStored) -> Result<Self, Self::Error> {
        let mut defense = BodyPartDefense::new(value.armor_value)?;
        defense.set_vital(value.vital).set_protected(value.protected);
        Ok(defense)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SpecialAbilityStored {
    name: String,
    #[serde(default)]
    description: String,
}

impl From<&SpecialAbility> for SpecialAbilityStored {
    fn from(ability: &SpecialAbility) -> Self {
        Self {
            name: ability.name().to_owned(),
            description: ability.description().to_owned(),
        }
    }
}

impl TryFrom<SpecialAbilityStored> for SpecialAbility {
    type Error = DomainError;

    fn try_from(value: SpecialAbilityStored) -> Result<Self, Self::Error> {
        SpecialAbility::new(value.name, value.description)
    }
}

/// Primary stats keyed by stat, each range written in dice notation.
pub(crate) type PrimaryStatsStored = BTreeMap<BodyStat, String>;

pub(crate) fn primary_stats_to_stored(
    stats: &BTreeMap<BodyStat, ValueRange>,
) -> PrimaryStatsStored {
    stats
        .iter()
        .map(|(stat, range)| (*stat, range.dice().to_string()))
        .collect()
}

pub(crate) fn primary_stats_from_stored(
    stored: PrimaryStatsStored,
) -> Result<BTreeMap<BodyStat, ValueRange>, DomainError> {
    stored
        .into_iter()
        .map(|(stat, notation)| Ok((stat, ValueRange::new(notation.parse()?))))
        .collect()
}
