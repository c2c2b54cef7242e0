//! Dice and dice-based value ranges.
//!
//! Dice are written in the usual `XdY+Z` notation: `2d6+3`, `d20`, `1d8-1`.

use std::fmt;
use std::str::FromStr;

use otherworlds_core::error::DomainError;
use otherworlds_core::rng::DeterministicRng;

/// Most dice a single expression may roll.
pub const MAX_DICE_QUANTITY: u32 = 1_000;

/// Most faces a single die may have.
pub const MAX_DICE_SIDES: u32 = 1_000;

/// A dice expression: `quantity` dice with `sides` faces plus a flat `bonus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dice {
    quantity: u32,
    sides: u32,
    bonus: i32,
}

impl Dice {
    /// Creates a dice expression.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `quantity` or `sides` is zero or
    /// above [`MAX_DICE_QUANTITY`] / [`MAX_DICE_SIDES`].
    pub fn new(quantity: u32, sides: u32, bonus: i32) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::validation("dice quantity must be at least 1"));
        }
        if quantity > MAX_DICE_QUANTITY {
            return Err(DomainError::validation(format!(
                "dice quantity must be at most {MAX_DICE_QUANTITY}, got {quantity}"
            )));
        }
        if sides == 0 {
            return Err(DomainError::validation("dice sides must be at least 1"));
        }
        if sides > MAX_DICE_SIDES {
            return Err(DomainError::validation(format!(
                "dice sides must be at most {MAX_DICE_SIDES}, got {sides}"
            )));
        }
        Ok(Self {
            quantity,
            sides,
            bonus,
        })
    }

    /// Number of dice rolled.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Faces per die.
    #[must_use]
    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Flat modifier added to the sum of the dice.
    #[must_use]
    pub fn bonus(&self) -> i32 {
        self.bonus
    }

    /// Lowest possible result (every die shows 1).
    #[must_use]
    pub fn min_roll(&self) -> i64 {
        i64::from(self.quantity) + i64::from(self.bonus)
    }

    /// Highest possible result (every die shows its top face).
    #[must_use]
    pub fn max_roll(&self) -> i64 {
        i64::from(self.quantity) * i64::from(self.sides) + i64::from(self.bonus)
    }

    /// Rolls the dice with the provided RNG.
    pub fn roll(&self, rng: &mut dyn DeterministicRng) -> i64 {
        let faces: i64 = (0..self.quantity)
            .map(|_| i64::from(rng.next_u32_range(1, self.sides)))
            .sum();
        faces + i64::from(self.bonus)
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.quantity, self.sides)?;
        match self.bonus {
            0 => Ok(()),
            b if b > 0 => write!(f, "+{b}"),
            b => write!(f, "{b}"),
        }
    }
}

impl FromStr for Dice {
    type Err = DomainError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err(DomainError::validation("empty dice expression"));
        }

        let d_pos = input.find('d').ok_or_else(|| {
            DomainError::validation(format!("missing 'd' separator in '{input}'"))
        })?;

        let quantity_str = &input[..d_pos];
        let quantity: u32 = if quantity_str.is_empty() {
            1
        } else {
            quantity_str.parse().map_err(|_| {
                DomainError::validation(format!("invalid dice quantity: '{quantity_str}'"))
            })?
        };

        let after_d = &input[d_pos + 1..];
        let (sides_str, bonus) = if let Some(pos) = after_d.find(['+', '-']) {
            let bonus: i32 = after_d[pos..].parse().map_err(|_| {
                DomainError::validation(format!("invalid dice bonus: '{}'", &after_d[pos..]))
            })?;
            (&after_d[..pos], bonus)
        } else {
            (after_d, 0)
        };

        let sides: u32 = sides_str
            .parse()
            .map_err(|_| DomainError::validation(format!("invalid dice sides: '{sides_str}'")))?;

        Self::new(quantity, sides, bonus)
    }
}

/// A stat range expressed by the dice that generate it.
///
/// `3d6+2` spans `5..=20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueRange {
    dice: Dice,
}

impl ValueRange {
    /// Creates a range covering every result of `dice`.
    #[must_use]
    pub fn new(dice: Dice) -> Self {
        Self { dice }
    }

    /// The generating dice.
    #[must_use]
    pub fn dice(&self) -> Dice {
        self.dice
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub fn min(&self) -> i64 {
        self.dice.min_roll()
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub fn max(&self) -> i64 {
        self.dice.max_roll()
    }

    /// Whether `value` lies within the range.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        (self.min()..=self.max()).contains(&value)
    }

    /// Rolls a value inside the range.
    pub fn roll(&self, rng: &mut dyn DeterministicRng) -> i64 {
        self.dice.roll(rng)
    }
}

impl From<Dice> for ValueRange {
    fn from(dice: Dice) -> Self {
        Self::new(dice)
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}..{})", self.dice, self.min(), self.max())
    }
}
