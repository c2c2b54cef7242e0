//! Commands for the Bestiary context.

use otherworlds_core::command::Command;
use uuid::Uuid;

use super::anatomy::{BodyDimension, BodyPart};
use super::currency::{HierarchyLevel, SingleCurrency};
use super::taxonomy::{Conviction, RaceCategory};

/// Command to create a new race.
#[derive(Debug, Clone)]
pub struct CreateRace {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The race name.
    pub name: String,
    /// The race category.
    pub category: RaceCategory,
    /// The moral leaning of the race.
    pub conviction: Conviction,
    /// Free-text description.
    pub description: String,
    /// Physical proportions of the race.
    pub body_dimension: BodyDimension,
}

impl Command for CreateRace {
    fn command_type(&self) -> &'static str {
        "bestiary.create_race"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to revise the descriptive and combat scalars of a race.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ReviseRace {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The race identifier.
    pub race_id: Uuid,
    /// New race name.
    pub name: Option<String>,
    /// New race category.
    pub category: Option<RaceCategory>,
    /// New moral leaning.
    pub conviction: Option<Conviction>,
    /// New free-text description.
    pub description: Option<String>,
    /// New free-text history.
    pub history: Option<String>,
    /// New initiative; must not be negative.
    pub initiative: Option<i32>,
    /// New experience-point award; must not be negative.
    pub experience_points: Option<i32>,
    /// New fighting spirit; must not be negative.
    pub fighting_spirit: Option<i32>,
}

impl Command for ReviseRace {
    fn command_type(&self) -> &'static str {
        "bestiary.revise_race"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to append a body part to a race.
#[derive(Debug, Clone)]
pub struct AddBodyPart {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The race identifier.
    pub race_id: Uuid,
    /// The body part to append.
    pub body_part: BodyPart,
}

impl Command for AddBodyPart {
    fn command_type(&self) -> &'static str {
        "bestiary.add_body_part"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to create a currency group.
#[derive(Debug, Clone)]
pub struct CreateCurrencyGroup {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The group name.
    pub name: String,
    /// Initial denominations; hierarchy levels must be unique.
    pub currencies: Vec<SingleCurrency>,
}

impl Command for CreateCurrencyGroup {
    fn command_type(&self) -> &'static str {
        "bestiary.create_currency_group"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to add a denomination to a currency group.
#[derive(Debug, Clone)]
pub struct AddCurrency {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The currency group identifier.
    pub currency_group_id: Uuid,
    /// The denomination to add.
    pub currency: SingleCurrency,
}

impl Command for AddCurrency {
    fn command_type(&self) -> &'static str {
        "bestiary.add_currency"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to bind a race's treasure to a currency group.
///
/// A race without treasure gets a new, empty one. A race that already has
/// treasure is rebound, which zeroes its balances.
#[derive(Debug, Clone)]
pub struct GrantTreasure {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The race identifier.
    pub race_id: Uuid,
    /// The currency group to bind to.
    pub currency_group_id: Uuid,
}

impl Command for GrantTreasure {
    fn command_type(&self) -> &'static str {
        "bestiary.grant_treasure"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to add coins to a race's treasure.
#[derive(Debug, Clone)]
pub struct DepositCoins {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The race identifier.
    pub race_id: Uuid,
    /// The denomination level.
    pub hierarchy_level: HierarchyLevel,
    /// Number of coins.
    pub amount: u64,
}

impl Command for DepositCoins {
    fn command_type(&self) -> &'static str {
        "bestiary.deposit_coins"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to take coins out of a race's treasure.
#[derive(Debug, Clone)]
pub struct WithdrawCoins {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The race identifier.
    pub race_id: Uuid,
    /// The denomination level.
    pub hierarchy_level: HierarchyLevel,
    /// Number of coins.
    pub amount: u64,
}

impl Command for WithdrawCoins {
    fn command_type(&self) -> &'static str {
        "bestiary.withdraw_coins"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::domain::taxonomy::{BodyPartCategory, RaceSize};

    fn all_commands(correlation_id: Uuid) -> Vec<Box<dyn Command>> {
        let race_id = Uuid::new_v4();
        let currency_group_id = Uuid::new_v4();
        vec![
            Box::new(CreateRace {
                correlation_id,
                name: "Kobold".to_owned(),
                category: RaceCategory::default(),
                conviction: Conviction::default(),
                description: String::new(),
                body_dimension: BodyDimension::from_pairs(
                    RaceSize::Small,
                    (15.0, 25.0),
                    (60.0, 80.0),
                    (60.0, 90.0),
                    60,
                )
                .unwrap(),
            }),
            Box::new(ReviseRace {
                correlation_id,
                race_id,
                ..ReviseRace::default()
            }),
            Box::new(AddBodyPart {
                correlation_id,
                race_id,
                body_part: BodyPart::new("Tail", BodyPartCategory::Tail, 1).unwrap(),
            }),
            Box::new(CreateCurrencyGroup {
                correlation_id,
                name: "Scrap".to_owned(),
                currencies: Vec::new(),
            }),
            Box::new(AddCurrency {
                correlation_id,
                currency_group_id,
                currency: SingleCurrency::new("Bolt", "bt", 1, 1).unwrap(),
            }),
            Box::new(GrantTreasure {
                correlation_id,
                race_id,
                currency_group_id,
            }),
            Box::new(DepositCoins {
                correlation_id,
                race_id,
                hierarchy_level: 1,
                amount: 3,
            }),
            Box::new(WithdrawCoins {
                correlation_id,
                race_id,
                hierarchy_level: 1,
                amount: 1,
            }),
        ]
    }

    #[test]
    fn test_command_types_are_unique_and_namespaced() {
        // Arrange
        let commands = all_commands(Uuid::new_v4());

        // Act
        let types: HashSet<&'static str> = commands.iter().map(|c| c.command_type()).collect();

        // Assert
        assert_eq!(types.len(), commands.len());
        assert!(types.iter().all(|t| t.starts_with("bestiary.")));
    }

    #[test]
    fn test_commands_report_their_correlation_id() {
        // Arrange
        let correlation_id = Uuid::new_v4();

        // Act
        let commands = all_commands(correlation_id);

        // Assert
        assert!(commands.iter().all(|c| c.correlation_id() == correlation_id));
    }
}
