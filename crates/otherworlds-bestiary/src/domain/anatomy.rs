//! Anatomy value objects: body dimensions and body parts.

use otherworlds_core::error::DomainError;

use super::dice::Dice;
use super::taxonomy::{BodyPartCategory, DamageType, RaceSize};

/// A measured span with `0 <= min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureRange {
    min: f64,
    max: f64,
}

impl MeasureRange {
    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a bound is not finite, `min` is
    /// negative, or `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self, DomainError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(DomainError::validation("range bounds must be finite"));
        }
        if min < 0.0 {
            return Err(DomainError::validation(format!(
                "range minimum must not be negative, got {min}"
            )));
        }
        if min > max {
            return Err(DomainError::validation(format!(
                "range minimum {min} exceeds maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// A zero-width range at zero.
    #[must_use]
    pub fn zero() -> Self {
        Self { min: 0.0, max: 0.0 }
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }
}

/// Physical proportions of a race: size, weight (kg), length and height
/// (cm), and maximum age in years.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDimension {
    size: RaceSize,
    weight_kg: MeasureRange,
    length_cm: MeasureRange,
    height_cm: MeasureRange,
    max_age: u32,
}

impl BodyDimension {
    /// Creates body dimensions from already-validated ranges.
    #[must_use]
    pub fn new(
        size: RaceSize,
        weight_kg: MeasureRange,
        length_cm: MeasureRange,
        height_cm: MeasureRange,
        max_age: u32,
    ) -> Self {
        Self {
            size,
            weight_kg,
            length_cm,
            height_cm,
            max_age,
        }
    }

    /// Creates body dimensions from raw `(min, max)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` naming the offending pair if any
    /// pair breaks `0 <= min <= max`.
    pub fn from_pairs(
        size: RaceSize,
        weight_kg: (f64, f64),
        length_cm: (f64, f64),
        height_cm: (f64, f64),
        max_age: u32,
    ) -> Result<Self, DomainError> {
        let pair = |label: &str, (min, max): (f64, f64)| {
            MeasureRange::new(min, max).map_err(|e| match e {
                DomainError::Validation(msg) => DomainError::validation(format!("{label}: {msg}")),
                other => other,
            })
        };
        Ok(Self::new(
            size,
            pair("weight", weight_kg)?,
            pair("length", length_cm)?,
            pair("height", height_cm)?,
            max_age,
        ))
    }

    #[must_use]
    pub fn size(&self) -> RaceSize {
        self.size
    }

    #[must_use]
    pub fn weight_kg(&self) -> MeasureRange {
        self.weight_kg
    }

    #[must_use]
    pub fn length_cm(&self) -> MeasureRange {
        self.length_cm
    }

    #[must_use]
    pub fn height_cm(&self) -> MeasureRange {
        self.height_cm
    }

    #[must_use]
    pub fn max_age(&self) -> u32 {
        self.max_age
    }
}

/// Offensive use of a body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyPartAttack {
    damage: Dice,
    damage_type: DamageType,
    initiative: i32,
    combinable: bool,
}

impl BodyPartAttack {
    /// Creates an attack dealing `damage`, with initiative 1, default damage
    /// type, and not combinable with other attacks.
    #[must_use]
    pub fn new(damage: Dice) -> Self {
        Self {
            damage,
            damage_type: DamageType::default(),
            initiative: 1,
            combinable: false,
        }
    }

    #[must_use]
    pub fn damage(&self) -> Dice {
        self.damage
    }

    #[must_use]
    pub fn damage_type(&self) -> DamageType {
        self.damage_type
    }

    #[must_use]
    pub fn initiative(&self) -> i32 {
        self.initiative
    }

    /// Whether the attack may be combined with other attacks in one turn.
    #[must_use]
    pub fn is_combinable(&self) -> bool {
        self.combinable
    }

    pub fn set_damage(&mut self, damage: Dice) -> &mut Self {
        self.damage = damage;
        self
    }

    pub fn set_damage_type(&mut self, damage_type: DamageType) -> &mut Self {
        self.damage_type = damage_type;
        self
    }

    /// Sets the initiative.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `initiative < 1`; the previous
    /// value is kept.
    pub fn set_initiative(&mut self, initiative: i32) -> Result<&mut Self, DomainError> {
        if initiative < 1 {
            return Err(DomainError::validation(format!(
                "attack initiative must be at least 1, got {initiative}"
            )));
        }
        self.initiative = initiative;
        Ok(self)
    }

    pub fn set_combinable(&mut self, combinable: bool) -> &mut Self {
        self.combinable = combinable;
        self
    }
}

/// Defensive properties of a body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyPartDefense {
    armor_value: i32,
    vital: bool,
    protected: bool,
}

impl BodyPartDefense {
    /// Creates a defense with the given armor value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `armor_value` is negative.
    pub fn new(armor_value: i32) -> Result<Self, DomainError> {
        let mut defense = Self {
            armor_value: 0,
            vital: false,
            protected: false,
        };
        defense.set_armor_value(armor_value)?;
        Ok(defense)
    }

    #[must_use]
    pub fn armor_value(&self) -> i32 {
        self.armor_value
    }

    /// Whether losing this part is fatal.
    #[must_use]
    pub fn is_vital(&self) -> bool {
        self.vital
    }

    /// Whether the part is shielded from direct hits.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        self.protected
    }

    /// Sets the armor value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `armor_value` is negative; the
    /// previous value is kept.
    pub fn set_armor_value(&mut self, armor_value: i32) -> Result<&mut Self, DomainError> {
        if armor_value < 0 {
            return Err(DomainError::validation(format!(
                "armor value must not be negative, got {armor_value}"
            )));
        }
        self.armor_value = armor_value;
        Ok(self)
    }

    pub fn set_vital(&mut self, vital: bool) -> &mut Self {
        self.vital = vital;
        self
    }

    pub fn set_protected(&mut self, protected: bool) -> &mut Self {
        self.protected = protected;
        self
    }
}

/// A named part of a creature's body, optionally usable to attack and/or
/// defend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPart {
    name: String,
    category: BodyPartCategory,
    quantity: u32,
    function: String,
    attack: Option<BodyPartAttack>,
    defense: Option<BodyPartDefense>,
}

impl BodyPart {
    /// Creates a purely cosmetic body part.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `name` is blank or `quantity` is
    /// zero.
    pub fn new(
        name: impl Into<String>,
        category: BodyPartCategory,
        quantity: u32,
    ) -> Result<Self, DomainError> {
        let mut part = Self {
            name: String::new(),
            category,
            quantity: 1,
            function: String::new(),
            attack: None,
            defense: None,
        };
        part.set_name(name)?.set_quantity(quantity)?;
        Ok(part)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn category(&self) -> BodyPartCategory {
        self.category
    }

    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Free-text description of what the part does.
    #[must_use]
    pub fn function(&self) -> &str {
        &self.function
    }

    #[must_use]
    pub fn attack(&self) -> Option<&BodyPartAttack> {
        self.attack.as_ref()
    }

    #[must_use]
    pub fn defense(&self) -> Option<&BodyPartDefense> {
        self.defense.as_ref()
    }

    /// Renames the part.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `name` is blank.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<&mut Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("body part name must not be empty"));
        }
        self.name = name;
        Ok(self)
    }

    pub fn set_category(&mut self, category: BodyPartCategory) -> &mut Self {
        self.category = category;
        self
    }

    /// Sets how many of this part a creature has.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `quantity` is zero.
    pub fn set_quantity(&mut self, quantity: u32) -> Result<&mut Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::validation(
                "body part quantity must be at least 1",
            ));
        }
        self.quantity = quantity;
        Ok(self)
    }

    pub fn set_function(&mut self, function: impl Into<String>) -> &mut Self {
        self.function = function.into();
        self
    }

    pub fn set_attack(&mut self, attack: Option<BodyPartAttack>) -> &mut Self {
        self.attack = attack;
        self
    }

    pub fn set_defense(&mut self, defense: Option<BodyPartDefense>) -> &mut Self {
        self.defense = defense;
        self
    }
}
