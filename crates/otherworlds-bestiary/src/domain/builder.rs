//! Fluent builder for the `Race` aggregate.
//!
//! The builder has two modes, selected by its constructor:
//!
//! - [`RaceAggregateBuilder::new`] starts from defaults and `build()` returns
//!   a freshly allocated [`Race`].
//! - [`RaceAggregateBuilder::from_existing`] copies the current state of a
//!   race into the builder while holding an exclusive handle on it.
//!   `build()` writes the accumulated state back into that same race and
//!   returns the handle, so the caller keeps the original instance.
//!
//! Setters validate immediately and leave the builder untouched on error.
//! The only checks deferred to `build()` are the presence of a name and of
//! body dimensions. In edit mode a failed `build()` leaves the original race
//! unchanged.

use std::collections::BTreeMap;

use otherworlds_core::error::DomainError;
use uuid::Uuid;

use super::anatomy::{BodyDimension, BodyPart};
use super::dice::ValueRange;
use super::race::{Race, SpecialAbility};
use super::taxonomy::{BodyStat, Conviction, DamageType, MovementType, RaceCategory};
use super::treasure::Treasure;

/// Create-mode target: `build()` allocates a new race.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fresh;

/// Edit-mode target: `build()` writes into the borrowed race.
#[derive(Debug)]
pub struct InPlace<'a>(&'a mut Race);

/// Builder for [`Race`]. See the module documentation for the two modes.
#[derive(Debug)]
pub struct RaceAggregateBuilder<T> {
    target: T,
    id: Uuid,
    name: String,
    category: RaceCategory,
    description: String,
    history: String,
    conviction: Conviction,
    initiative: i32,
    experience_points: i32,
    fighting_spirit: i32,
    zone_spawn_modifier: i32,
    domestication_value: i32,
    body_dimension: Option<BodyDimension>,
    treasure: Option<Treasure>,
    body_parts: Vec<BodyPart>,
    special_abilities: Vec<SpecialAbility>,
    hierarchy: Vec<String>,
    primary_stats: BTreeMap<BodyStat, ValueRange>,
    vulnerabilities: BTreeMap<DamageType, f64>,
    mobility: BTreeMap<MovementType, i32>,
}

impl RaceAggregateBuilder<Fresh> {
    /// Starts a builder in create mode: new identity, empty collections,
    /// neutral enumerations, zeroed numbers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: Fresh,
            id: Uuid::new_v4(),
            name: String::new(),
            category: RaceCategory::default(),
            description: String::new(),
            history: String::new(),
            conviction: Conviction::default(),
            initiative: 0,
            experience_points: 0,
            fighting_spirit: 0,
            zone_spawn_modifier: 0,
            domestication_value: 0,
            body_dimension: None,
            treasure: None,
            body_parts: Vec::new(),
            special_abilities: Vec::new(),
            hierarchy: Vec::new(),
            primary_stats: BTreeMap::new(),
            vulnerabilities: BTreeMap::new(),
            mobility: BTreeMap::new(),
        }
    }

    /// Validates the accumulated state and allocates a new race.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::State` if no name or no body dimensions were
    /// supplied.
    pub fn build(self) -> Result<Race, DomainError> {
        let (Fresh, race) = self.assemble()?;
        Ok(race)
    }
}

impl Default for RaceAggregateBuilder<Fresh> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RaceAggregateBuilder<InPlace<'a>> {
    /// Starts a builder in edit mode. Scalars and collections are copied out
    /// of `race`; the race itself is not touched until `build()`.
    #[must_use]
    pub fn from_existing(race: &'a mut Race) -> Self {
        Self {
            id: race.id,
            name: race.name.clone(),
            category: race.category,
            description: race.description.clone(),
            history: race.history.clone(),
            conviction: race.conviction,
            initiative: race.initiative,
            experience_points: race.experience_points,
            fighting_spirit: race.fighting_spirit,
            zone_spawn_modifier: race.zone_spawn_modifier,
            domestication_value: race.domestication_value,
            body_dimension: Some(race.body_dimension),
            treasure: race.treasure.clone(),
            body_parts: race.body_parts.clone(),
            special_abilities: race.special_abilities.clone(),
            hierarchy: race.hierarchy.clone(),
            primary_stats: race.primary_stats.clone(),
            vulnerabilities: race.vulnerabilities.clone(),
            mobility: race.mobility.clone(),
            target: InPlace(race),
        }
    }

    /// Validates the accumulated state and writes it back into the race the
    /// builder was created from, returning that same race.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::State` if the name was cleared. The original
    /// race is left unchanged on error.
    pub fn build(self) -> Result<&'a mut Race, DomainError> {
        let (InPlace(target), race) = self.assemble()?;
        *target = race;
        Ok(target)
    }
}

impl<T> RaceAggregateBuilder<T> {
    /// Pre-sets the aggregate identity (e.g. when rehydrating from storage).
    pub fn with_id(&mut self, id: Uuid) -> &mut Self {
        self.id = id;
        self
    }

    /// Sets the name. Emptiness is checked by `build()`.
    pub fn with_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn with_category(&mut self, category: RaceCategory) -> &mut Self {
        self.category = category;
        self
    }

    pub fn with_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn with_history(&mut self, history: impl Into<String>) -> &mut Self {
        self.history = history.into();
        self
    }

    pub fn with_conviction(&mut self, conviction: Conviction) -> &mut Self {
        self.conviction = conviction;
        self
    }

    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `initiative` is negative.
    pub fn with_initiative(&mut self, initiative: i32) -> Result<&mut Self, DomainError> {
        self.initiative = non_negative("initiative", initiative)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `experience_points` is negative.
    pub fn with_experience_points(
        &mut self,
        experience_points: i32,
    ) -> Result<&mut Self, DomainError> {
        self.experience_points = non_negative("experience points", experience_points)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `fighting_spirit` is negative.
    pub fn with_fighting_spirit(&mut self, fighting_spirit: i32) -> Result<&mut Self, DomainError> {
        self.fighting_spirit = non_negative("fighting spirit", fighting_spirit)?;
        Ok(self)
    }

    pub fn with_zone_spawn_modifier(&mut self, modifier: i32) -> &mut Self {
        self.zone_spawn_modifier = modifier;
        self
    }

    pub fn with_domestication_value(&mut self, value: i32) -> &mut Self {
        self.domestication_value = value;
        self
    }

    pub fn with_body_dimensions(&mut self, body_dimension: BodyDimension) -> &mut Self {
        self.body_dimension = Some(body_dimension);
        self
    }

    /// Attaches a treasure, or removes it with `None`.
    pub fn with_treasure(&mut self, treasure: Option<Treasure>) -> &mut Self {
        self.treasure = treasure;
        self
    }

    /// Adds (or overwrites) the range for `stat`.
    pub fn add_primary_stat(&mut self, stat: BodyStat, range: ValueRange) -> &mut Self {
        self.primary_stats.insert(stat, range);
        self
    }

    pub fn add_primary_stats(
        &mut self,
        stats: impl IntoIterator<Item = (BodyStat, ValueRange)>,
    ) -> &mut Self {
        self.primary_stats.extend(stats);
        self
    }

    /// Adds (or overwrites) the damage multiplier for `damage_type`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `multiplier` is negative or not
    /// finite.
    pub fn add_vulnerability(
        &mut self,
        damage_type: DamageType,
        multiplier: f64,
    ) -> Result<&mut Self, DomainError> {
        self.vulnerabilities
            .insert(damage_type, checked_multiplier(damage_type, multiplier)?);
        Ok(self)
    }

    /// Adds several vulnerabilities. Nothing is added if any entry is invalid.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for the first invalid multiplier.
    pub fn add_vulnerabilities(
        &mut self,
        vulnerabilities: impl IntoIterator<Item = (DamageType, f64)>,
    ) -> Result<&mut Self, DomainError> {
        let checked = vulnerabilities
            .into_iter()
            .map(|(damage_type, m)| Ok((damage_type, checked_multiplier(damage_type, m)?)))
            .collect::<Result<Vec<_>, DomainError>>()?;
        self.vulnerabilities.extend(checked);
        Ok(self)
    }

    /// Adds (or overwrites) the speed for `movement`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `speed` is negative.
    pub fn add_mobility(
        &mut self,
        movement: MovementType,
        speed: i32,
    ) -> Result<&mut Self, DomainError> {
        self.mobility
            .insert(movement, non_negative(movement.as_str(), speed)?);
        Ok(self)
    }

    /// Adds several movement speeds. Nothing is added if any entry is invalid.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for the first negative speed.
    pub fn add_mobilities(
        &mut self,
        mobility: impl IntoIterator<Item = (MovementType, i32)>,
    ) -> Result<&mut Self, DomainError> {
        let checked = mobility
            .into_iter()
            .map(|(movement, speed)| Ok((movement, non_negative(movement.as_str(), speed)?)))
            .collect::<Result<Vec<_>, DomainError>>()?;
        self.mobility.extend(checked);
        Ok(self)
    }

    pub fn add_body_part(&mut self, part: BodyPart) -> &mut Self {
        self.body_parts.push(part);
        self
    }

    pub fn add_body_parts(&mut self, parts: impl IntoIterator<Item = BodyPart>) -> &mut Self {
        self.body_parts.extend(parts);
        self
    }

    pub fn add_special_ability(&mut self, ability: SpecialAbility) -> &mut Self {
        self.special_abilities.push(ability);
        self
    }

    pub fn add_special_abilities(
        &mut self,
        abilities: impl IntoIterator<Item = SpecialAbility>,
    ) -> &mut Self {
        self.special_abilities.extend(abilities);
        self
    }

    /// Appends a rank to the race hierarchy.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `rank` is blank.
    pub fn add_hierarchy_entry(&mut self, rank: impl Into<String>) -> Result<&mut Self, DomainError> {
        self.hierarchy.push(checked_rank(rank.into())?);
        Ok(self)
    }

    /// Appends several ranks. Nothing is added if any rank is blank.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for the first blank rank.
    pub fn add_hierarchy_entries(
        &mut self,
        ranks: impl IntoIterator<Item = String>,
    ) -> Result<&mut Self, DomainError> {
        let checked = ranks
            .into_iter()
            .map(checked_rank)
            .collect::<Result<Vec<_>, DomainError>>()?;
        self.hierarchy.extend(checked);
        Ok(self)
    }

    fn assemble(self) -> Result<(T, Race), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::state("race name is required"));
        }
        let body_dimension = self
            .body_dimension
            .ok_or_else(|| DomainError::state("race body dimensions are required"))?;

        let race = Race {
            id: self.id,
            name: self.name,
            category: self.category,
            description: self.description,
            history: self.history,
            conviction: self.conviction,
            initiative: self.initiative,
            experience_points: self.experience_points,
            fighting_spirit: self.fighting_spirit,
            zone_spawn_modifier: self.zone_spawn_modifier,
            domestication_value: self.domestication_value,
            body_dimension,
            treasure: self.treasure,
            body_parts: self.body_parts,
            special_abilities: self.special_abilities,
            hierarchy: self.hierarchy,
            primary_stats: self.primary_stats,
            vulnerabilities: self.vulnerabilities,
            mobility: self.mobility,
        };
        Ok((self.target, race))
    }
}

fn non_negative(field: &str, value: i32) -> Result<i32, DomainError> {
    if value < 0 {
        return Err(DomainError::validation(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(value)
}

fn checked_multiplier(damage_type: DamageType, multiplier: f64) -> Result<f64, DomainError> {
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(DomainError::validation(format!(
            "{damage_type} vulnerability multiplier must be a non-negative number, got {multiplier}"
        )));
    }
    Ok(multiplier)
}

fn checked_rank(rank: String) -> Result<String, DomainError> {
    if rank.trim().is_empty() {
        return Err(DomainError::validation("hierarchy rank must not be empty"));
    }
    Ok(rank)
}
