//! The `Race` aggregate root.
//!
//! A race is only ever created or changed through
//! [`RaceAggregateBuilder`](super::builder::RaceAggregateBuilder), which is
//! where its invariants are enforced.

use std::collections::BTreeMap;

use otherworlds_core::error::DomainError;
use otherworlds_core::rng::DeterministicRng;
use uuid::Uuid;

use super::anatomy::{BodyDimension, BodyPart, BodyPartAttack};
use super::dice::ValueRange;
use super::taxonomy::{BodyStat, Conviction, DamageType, MovementType, RaceCategory};
use super::treasure::Treasure;

/// A named special ability, e.g. "Regeneration".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialAbility {
    name: String,
    description: String,
}

impl SpecialAbility {
    /// Creates a special ability.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `name` is blank.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation(
                "special ability name must not be empty",
            ));
        }
        Ok(Self {
            name,
            description: description.into(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// The aggregate root for a creature race.
#[derive(Debug, Clone, PartialEq)]
pub struct Race {
    /// Aggregate identifier.
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) category: RaceCategory,
    pub(crate) description: String,
    pub(crate) history: String,
    pub(crate) conviction: Conviction,
    pub(crate) initiative: i32,
    pub(crate) experience_points: i32,
    pub(crate) fighting_spirit: i32,
    pub(crate) zone_spawn_modifier: i32,
    pub(crate) domestication_value: i32,
    pub(crate) body_dimension: BodyDimension,
    pub(crate) treasure: Option<Treasure>,
    pub(crate) body_parts: Vec<BodyPart>,
    pub(crate) special_abilities: Vec<SpecialAbility>,
    pub(crate) hierarchy: Vec<String>,
    pub(crate) primary_stats: BTreeMap<BodyStat, ValueRange>,
    pub(crate) vulnerabilities: BTreeMap<DamageType, f64>,
    pub(crate) mobility: BTreeMap<MovementType, i32>,
}

impl Race {
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn category(&self) -> RaceCategory {
        self.category
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn history(&self) -> &str {
        &self.history
    }

    #[must_use]
    pub fn conviction(&self) -> Conviction {
        self.conviction
    }

    #[must_use]
    pub fn initiative(&self) -> i32 {
        self.initiative
    }

    #[must_use]
    pub fn experience_points(&self) -> i32 {
        self.experience_points
    }

    #[must_use]
    pub fn fighting_spirit(&self) -> i32 {
        self.fighting_spirit
    }

    /// Modifier applied to spawn chances in a zone.
    #[must_use]
    pub fn zone_spawn_modifier(&self) -> i32 {
        self.zone_spawn_modifier
    }

    /// How easily members of the race can be tamed.
    #[must_use]
    pub fn domestication_value(&self) -> i32 {
        self.domestication_value
    }

    #[must_use]
    pub fn body_dimension(&self) -> &BodyDimension {
        &self.body_dimension
    }

    #[must_use]
    pub fn treasure(&self) -> Option<&Treasure> {
        self.treasure.as_ref()
    }

    /// Mutable access to the treasure ledger. Coin invariants are enforced
    /// by `Treasure` itself.
    pub fn treasure_mut(&mut self) -> Option<&mut Treasure> {
        self.treasure.as_mut()
    }

    #[must_use]
    pub fn body_parts(&self) -> &[BodyPart] {
        &self.body_parts
    }

    #[must_use]
    pub fn special_abilities(&self) -> &[SpecialAbility] {
        &self.special_abilities
    }

    /// Ranks within the race's social hierarchy, highest first.
    #[must_use]
    pub fn hierarchy(&self) -> &[String] {
        &self.hierarchy
    }

    #[must_use]
    pub fn primary_stats(&self) -> &BTreeMap<BodyStat, ValueRange> {
        &self.primary_stats
    }

    #[must_use]
    pub fn vulnerabilities(&self) -> &BTreeMap<DamageType, f64> {
        &self.vulnerabilities
    }

    #[must_use]
    pub fn mobility(&self) -> &BTreeMap<MovementType, i32> {
        &self.mobility
    }

    /// Damage multiplier against `damage_type`; 1.0 when none is recorded.
    #[must_use]
    pub fn vulnerability_multiplier(&self, damage_type: DamageType) -> f64 {
        self.vulnerabilities.get(&damage_type).copied().unwrap_or(1.0)
    }

    /// Speed for `movement`, if the race can move that way.
    #[must_use]
    pub fn speed(&self, movement: MovementType) -> Option<i32> {
        self.mobility.get(&movement).copied()
    }

    /// Body parts that can attack, paired with their attack.
    pub fn attacks(&self) -> impl Iterator<Item = (&BodyPart, &BodyPartAttack)> {
        self.body_parts
            .iter()
            .filter_map(|part| part.attack().map(|attack| (part, attack)))
    }

    /// Sum of armor values over every defended part, counting each copy.
    #[must_use]
    pub fn natural_armor(&self) -> i64 {
        self.body_parts
            .iter()
            .filter_map(|part| {
                part.defense()
                    .map(|d| i64::from(d.armor_value()) * i64::from(part.quantity()))
            })
            .sum()
    }

    /// Body parts whose loss is fatal.
    pub fn vital_parts(&self) -> impl Iterator<Item = &BodyPart> {
        self.body_parts
            .iter()
            .filter(|part| part.defense().is_some_and(|d| d.is_vital()))
    }

    /// Rolls a value for `stat`, if the race defines it.
    pub fn roll_primary_stat(
        &self,
        stat: BodyStat,
        rng: &mut dyn DeterministicRng,
    ) -> Option<i64> {
        self.primary_stats.get(&stat).map(|range| range.roll(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::anatomy::{BodyPartDefense, MeasureRange};
    use crate::domain::builder::RaceAggregateBuilder;
    use crate::domain::dice::Dice;
    use crate::domain::taxonomy::{BodyPartCategory, RaceSize};
    use otherworlds_test_support::SequenceRng;

    fn dims() -> BodyDimension {
        BodyDimension::new(
            RaceSize::Medium,
            MeasureRange::new(50.0, 90.0).unwrap(),
            MeasureRange::new(40.0, 60.0).unwrap(),
            MeasureRange::new(150.0, 190.0).unwrap(),
            80,
        )
    }

    fn troll() -> Race {
        let mut claw = BodyPart::new("Claw", BodyPartCategory::Claw, 2).unwrap();
        claw.set_attack(Some(BodyPartAttack::new(Dice::new(1, 6, 0).unwrap())));
        let mut hide = BodyPart::new("Hide", BodyPartCategory::Torso, 1).unwrap();
        hide.set_defense(Some(BodyPartDefense::new(3).unwrap()));
        let mut head = BodyPart::new("Head", BodyPartCategory::Head, 1).unwrap();
        let mut skull = BodyPartDefense::new(2).unwrap();
        skull.set_vital(true);
        head.set_defense(Some(skull));
        let mut arm = BodyPart::new("Arm", BodyPartCategory::Arm, 2).unwrap();
        arm.set_defense(Some(BodyPartDefense::new(1).unwrap()));

        let mut builder = RaceAggregateBuilder::new();
        builder
            .with_name("Troll")
            .with_body_dimensions(dims())
            .add_body_parts([claw, hide, head, arm])
            .add_primary_stat(BodyStat::Strength, Dice::new(3, 6, 2).unwrap().into())
            .add_vulnerability(DamageType::Fire, 2.0)
            .unwrap()
            .add_mobility(MovementType::Walk, 8)
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_special_ability_requires_name() {
        assert!(SpecialAbility::new(" ", "nothing").is_err());
        let ability = SpecialAbility::new("Regeneration", "Heals 1 HP per round").unwrap();
        assert_eq!(ability.name(), "Regeneration");
        assert_eq!(ability.description(), "Heals 1 HP per round");
    }

    #[test]
    fn test_attacks_lists_only_offensive_parts() {
        let race = troll();

        let names: Vec<&str> = race.attacks().map(|(part, _)| part.name()).collect();

        assert_eq!(names, vec!["Claw"]);
    }

    #[test]
    fn test_natural_armor_counts_every_copy() {
        // hide 3 + head 2 + two arms at 1
        assert_eq!(troll().natural_armor(), 7);
    }

    #[test]
    fn test_vital_parts() {
        let race = troll();

        let vital: Vec<&str> = race.vital_parts().map(BodyPart::name).collect();

        assert_eq!(vital, vec!["Head"]);
    }

    #[test]
    fn test_vulnerability_multiplier_defaults_to_one() {
        let race = troll();

        assert!((race.vulnerability_multiplier(DamageType::Fire) - 2.0).abs() < f64::EPSILON);
        assert!((race.vulnerability_multiplier(DamageType::Cold) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_speed_lookup() {
        let race = troll();

        assert_eq!(race.speed(MovementType::Walk), Some(8));
        assert_eq!(race.speed(MovementType::Fly), None);
    }

    #[test]
    fn test_roll_primary_stat_uses_rng() {
        let race = troll();
        let mut rng = SequenceRng::new(vec![2, 3, 4]);

        assert_eq!(race.roll_primary_stat(BodyStat::Strength, &mut rng), Some(11));
        assert_eq!(race.roll_primary_stat(BodyStat::Charisma, &mut rng), None);
    }
}
