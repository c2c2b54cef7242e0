//! Command handlers for the Bestiary context.
//!
//! Each handler loads the record it needs, maps it into the domain, runs the
//! domain operation, and saves the flattened result back.

use otherworlds_core::error::DomainError;
use otherworlds_core::repository::Repository;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::builder::RaceAggregateBuilder;
use crate::domain::commands::{
    AddBodyPart, AddCurrency, CreateCurrencyGroup, CreateRace, DepositCoins, GrantTreasure,
    ReviseRace, WithdrawCoins,
};
use crate::domain::currency::CurrencyGroup;
use crate::domain::race::Race;
use crate::domain::treasure::Treasure;
use crate::persistence::mapper::{
    currency_group_from_record, currency_group_to_record, race_from_record, race_to_record,
};
use crate::persistence::record::{CurrencyGroupRecord, RaceRecord};

/// Result of a successfully handled race command.
#[derive(Debug)]
pub struct RaceCommandResult {
    /// The race affected by the command.
    pub race_id: Uuid,
    /// The record that was saved.
    pub record: RaceRecord,
}

/// Result of a successfully handled currency group command.
#[derive(Debug)]
pub struct CurrencyGroupCommandResult {
    /// The currency group affected by the command.
    pub currency_group_id: Uuid,
    /// The record that was saved.
    pub record: CurrencyGroupRecord,
}

/// A race together with the currency group its treasure is bound to, as
/// joined in by the loader.
struct LoadedRace {
    race: Race,
    currency_group: Option<CurrencyGroup>,
}

async fn load_race(
    race_id: Uuid,
    races: &dyn Repository<RaceRecord>,
) -> Result<LoadedRace, DomainError> {
    let record = races
        .find_by_id(race_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(race_id))?;
    let race = race_from_record(&record)?;
    let currency_group = record
        .treasure
        .as_ref()
        .and_then(|treasure| treasure.currency_group.as_ref())
        .and_then(|group| currency_group_from_record(group).ok());
    Ok(LoadedRace {
        race,
        currency_group,
    })
}

pub(crate) async fn load_currency_group(
    currency_group_id: Uuid,
    groups: &dyn Repository<CurrencyGroupRecord>,
) -> Result<CurrencyGroup, DomainError> {
    let record = groups
        .find_by_id(currency_group_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(currency_group_id))?;
    currency_group_from_record(&record)
}

async fn save_race(
    race: &Race,
    currency_group: Option<&CurrencyGroup>,
    races: &dyn Repository<RaceRecord>,
) -> Result<RaceCommandResult, DomainError> {
    let record = race_to_record(race, currency_group)?;
    races.save(&record).await?;
    Ok(RaceCommandResult {
        race_id: race.id(),
        record,
    })
}

async fn save_currency_group(
    group: &CurrencyGroup,
    groups: &dyn Repository<CurrencyGroupRecord>,
) -> Result<CurrencyGroupCommandResult, DomainError> {
    let record = currency_group_to_record(group)?;
    groups.save(&record).await?;
    Ok(CurrencyGroupCommandResult {
        currency_group_id: group.id(),
        record,
    })
}

fn missing_treasure(race_id: Uuid) -> DomainError {
    DomainError::state(format!("race {race_id} has no treasure"))
}

/// Handles the `CreateRace` command: builds a new race and saves it.
///
/// # Errors
///
/// Returns `DomainError::State` if the name is blank, or the repository's
/// error if saving fails.
#[instrument(skip(command, races), fields(race_name = %command.name))]
pub async fn handle_create_race(
    command: &CreateRace,
    races: &dyn Repository<RaceRecord>,
) -> Result<RaceCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling create_race command");

    let mut builder = RaceAggregateBuilder::new();
    builder
        .with_name(command.name.clone())
        .with_category(command.category)
        .with_conviction(command.conviction)
        .with_description(command.description.clone())
        .with_body_dimensions(command.body_dimension);
    let race = builder.build()?;

    save_race(&race, None, races).await
}

/// Handles the `ReviseRace` command: edits the race in place and saves it.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the race does not exist,
/// `DomainError::Validation` for a negative number, and
/// `DomainError::State` if the name is cleared.
#[instrument(skip(command, races), fields(race_id = %command.race_id))]
pub async fn handle_revise_race(
    command: &ReviseRace,
    races: &dyn Repository<RaceRecord>,
) -> Result<RaceCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling revise_race command");

    let LoadedRace {
        mut race,
        currency_group,
    } = load_race(command.race_id, races).await?;

    let mut builder = RaceAggregateBuilder::from_existing(&mut race);
    if let Some(name) = &command.name {
        builder.with_name(name.clone());
    }
    if let Some(category) = command.category {
        builder.with_category(category);
    }
    if let Some(conviction) = command.conviction {
        builder.with_conviction(conviction);
    }
    if let Some(description) = &command.description {
        builder.with_description(description.clone());
    }
    if let Some(history) = &command.history {
        builder.with_history(history.clone());
    }
    if let Some(initiative) = command.initiative {
        builder.with_initiative(initiative)?;
    }
    if let Some(experience_points) = command.experience_points {
        builder.with_experience_points(experience_points)?;
    }
    if let Some(fighting_spirit) = command.fighting_spirit {
        builder.with_fighting_spirit(fighting_spirit)?;
    }
    builder.build()?;

    save_race(&race, currency_group.as_ref(), races).await
}

/// Handles the `AddBodyPart` command: appends the part in edit mode and
/// saves the race.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the race does not exist.
#[instrument(skip(command, races), fields(race_id = %command.race_id))]
pub async fn handle_add_body_part(
    command: &AddBodyPart,
    races: &dyn Repository<RaceRecord>,
) -> Result<RaceCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling add_body_part command");

    let LoadedRace {
        mut race,
        currency_group,
    } = load_race(command.race_id, races).await?;

    let mut builder = RaceAggregateBuilder::from_existing(&mut race);
    builder.add_body_part(command.body_part.clone());
    builder.build()?;

    save_race(&race, currency_group.as_ref(), races).await
}

/// Handles the `CreateCurrencyGroup` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank name and
/// `DomainError::State` if two denominations share a hierarchy level.
#[instrument(skip(command, groups), fields(group_name = %command.name))]
pub async fn handle_create_currency_group(
    command: &CreateCurrencyGroup,
    groups: &dyn Repository<CurrencyGroupRecord>,
) -> Result<CurrencyGroupCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling create_currency_group command");

    let group = CurrencyGroup::new(command.name.clone(), command.currencies.clone())?;

    save_currency_group(&group, groups).await
}

/// Handles the `AddCurrency` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the group does not exist and
/// `DomainError::State` if the hierarchy level is already taken.
#[instrument(skip(command, groups), fields(currency_group_id = %command.currency_group_id))]
pub async fn handle_add_currency(
    command: &AddCurrency,
    groups: &dyn Repository<CurrencyGroupRecord>,
) -> Result<CurrencyGroupCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling add_currency command");

    let mut group = load_currency_group(command.currency_group_id, groups).await?;
    group.add_currency(command.currency.clone())?;

    save_currency_group(&group, groups).await
}

/// Handles the `GrantTreasure` command: gives the race an empty treasure
/// bound to the group, or rebinds its existing treasure (zeroing balances).
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the race or the group does
/// not exist.
#[instrument(
    skip(command, races, groups),
    fields(race_id = %command.race_id, currency_group_id = %command.currency_group_id)
)]
pub async fn handle_grant_treasure(
    command: &GrantTreasure,
    races: &dyn Repository<RaceRecord>,
    groups: &dyn Repository<CurrencyGroupRecord>,
) -> Result<RaceCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling grant_treasure command");

    let LoadedRace { mut race, .. } = load_race(command.race_id, races).await?;
    let group = load_currency_group(command.currency_group_id, groups).await?;

    if let Some(treasure) = race.treasure_mut() {
        treasure.set_currency_group(&group);
    } else {
        let mut builder = RaceAggregateBuilder::from_existing(&mut race);
        builder.with_treasure(Some(Treasure::new(&group)));
        builder.build()?;
    }

    save_race(&race, Some(&group), races).await
}

/// Handles the `DepositCoins` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the race or its currency
/// group does not exist, and `DomainError::State` if the race has no
/// treasure or the level is not part of the group.
#[instrument(
    skip(command, races, groups),
    fields(race_id = %command.race_id, level = command.hierarchy_level)
)]
pub async fn handle_deposit_coins(
    command: &DepositCoins,
    races: &dyn Repository<RaceRecord>,
    groups: &dyn Repository<CurrencyGroupRecord>,
) -> Result<RaceCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling deposit_coins command");

    let LoadedRace { mut race, .. } = load_race(command.race_id, races).await?;
    let currency_group_id = race
        .treasure()
        .map(Treasure::currency_group_id)
        .ok_or_else(|| missing_treasure(command.race_id))?;
    let group = load_currency_group(currency_group_id, groups).await?;

    race.treasure_mut()
        .ok_or_else(|| missing_treasure(command.race_id))?
        .add_coins(&group, command.hierarchy_level, command.amount)?;

    save_race(&race, Some(&group), races).await
}

/// Handles the `WithdrawCoins` command.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the race or its currency
/// group does not exist, and `DomainError::State` if the race has no
/// treasure, the level is not part of the group, or funds are insufficient.
#[instrument(
    skip(command, races, groups),
    fields(race_id = %command.race_id, level = command.hierarchy_level)
)]
pub async fn handle_withdraw_coins(
    command: &WithdrawCoins,
    races: &dyn Repository<RaceRecord>,
    groups: &dyn Repository<CurrencyGroupRecord>,
) -> Result<RaceCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling withdraw_coins command");

    let LoadedRace { mut race, .. } = load_race(command.race_id, races).await?;
    let currency_group_id = race
        .treasure()
        .map(Treasure::currency_group_id)
        .ok_or_else(|| missing_treasure(command.race_id))?;
    let group = load_currency_group(currency_group_id, groups).await?;

    race.treasure_mut()
        .ok_or_else(|| missing_treasure(command.race_id))?
        .remove_coins(&group, command.hierarchy_level, command.amount)?;

    save_race(&race, Some(&group), races).await
}

#[cfg(test)]
mod tests {
    use otherworlds_core::error::DomainError;
    use otherworlds_core::repository::Repository;
    use otherworlds_test_support::{FailingRepository, InMemoryRepository};
    use uuid::Uuid;

    use crate::application::command_handlers::{
        handle_add_body_part, handle_add_currency, handle_create_currency_group,
        handle_create_race, handle_deposit_coins, handle_grant_treasure, handle_revise_race,
        handle_withdraw_coins,
    };
    use crate::domain::anatomy::{BodyDimension, BodyPart};
    use crate::domain::commands::{
        AddBodyPart, AddCurrency, CreateCurrencyGroup, CreateRace, DepositCoins, GrantTreasure,
        ReviseRace, WithdrawCoins,
    };
    use crate::domain::currency::SingleCurrency;
    use crate::domain::race::Race;
    use crate::domain::taxonomy::{BodyPartCategory, Conviction, RaceCategory, RaceSize};
    use crate::persistence::mapper::race_from_record;
    use crate::persistence::record::{CurrencyGroupRecord, RaceRecord};

    fn create_race_command(name: &str) -> CreateRace {
        CreateRace {
            correlation_id: Uuid::new_v4(),
            name: name.to_owned(),
            category: RaceCategory::Beast,
            conviction: Conviction::Neutral,
            description: "Prowls the marshes".to_owned(),
            body_dimension: BodyDimension::from_pairs(
                RaceSize::Medium,
                (40.0, 70.0),
                (120.0, 160.0),
                (60.0, 90.0),
                25,
            )
            .unwrap(),
        }
    }

    async fn seeded_race(races: &InMemoryRepository<RaceRecord>) -> Uuid {
        handle_create_race(&create_race_command("Marsh Cat"), races)
            .await
            .unwrap()
            .race_id
    }

    async fn seeded_group(groups: &InMemoryRepository<CurrencyGroupRecord>) -> Uuid {
        let command = CreateCurrencyGroup {
            correlation_id: Uuid::new_v4(),
            name: "Imperial Coinage".to_owned(),
            currencies: vec![
                SingleCurrency::new("Gold", "gp", 1, 100).unwrap(),
                SingleCurrency::new("Silver", "sp", 2, 10).unwrap(),
                SingleCurrency::new("Copper", "cp", 3, 1).unwrap(),
            ],
        };
        handle_create_currency_group(&command, groups)
            .await
            .unwrap()
            .currency_group_id
    }

    async fn seeded_race_with_treasure(
        races: &InMemoryRepository<RaceRecord>,
        groups: &InMemoryRepository<CurrencyGroupRecord>,
    ) -> (Uuid, Uuid) {
        let race_id = seeded_race(races).await;
        let currency_group_id = seeded_group(groups).await;
        let command = GrantTreasure {
            correlation_id: Uuid::new_v4(),
            race_id,
            currency_group_id,
        };
        handle_grant_treasure(&command, races, groups).await.unwrap();
        (race_id, currency_group_id)
    }

    async fn stored_race(races: &InMemoryRepository<RaceRecord>, race_id: Uuid) -> Race {
        let record = races.find_by_id(race_id).await.unwrap().unwrap();
        race_from_record(&record).unwrap()
    }

    #[tokio::test]
    async fn test_handle_create_race_saves_record() {
        // Arrange
        let races: InMemoryRepository<RaceRecord> = InMemoryRepository::new();

        // Act
        let result = handle_create_race(&create_race_command("Marsh Cat"), &races)
            .await
            .unwrap();

        // Assert
        assert_eq!(races.len(), 1);
        let race = stored_race(&races, result.race_id).await;
        assert_eq!(race.name(), "Marsh Cat");
        assert_eq!(race.category(), RaceCategory::Beast);
        assert_eq!(result.record.category, "beast");
    }

    #[tokio::test]
    async fn test_handle_create_race_rejects_blank_name() {
        // Arrange
        let races: InMemoryRepository<RaceRecord> = InMemoryRepository::new();

        // Act
        let result = handle_create_race(&create_race_command("  "), &races).await;

        // Assert
        match result.unwrap_err() {
            DomainError::State(msg) => assert_eq!(msg, "race name is required"),
            other => panic!("expected State, got {other:?}"),
        }
        assert!(races.is_empty());
    }

    #[tokio::test]
    async fn test_handle_create_race_propagates_repository_failure() {
        // Arrange
        let races = FailingRepository;

        // Act
        let result = handle_create_race(&create_race_command("Marsh Cat"), &races).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn test_handle_revise_race_updates_only_given_fields() {
        // Arrange
        let races: InMemoryRepository<RaceRecord> = InMemoryRepository::new();
        let race_id = seeded_race(&races).await;
        let command = ReviseRace {
            correlation_id: Uuid::new_v4(),
            race_id,
            history: Some("Driven out of the lowlands".to_owned()),
            initiative: Some(6),
            ..ReviseRace::default()
        };

        // Act
        handle_revise_race(&command, &races).await.unwrap();

        // Assert
        let race = stored_race(&races, race_id).await;
        assert_eq!(race.id(), race_id);
        assert_eq!(race.name(), "Marsh Cat");
        assert_eq!(race.history(), "Driven out of the lowlands");
        assert_eq!(race.initiative(), 6);
        assert_eq!(race.description(), "Prowls the marshes");
    }

    #[tokio::test]
    async fn test_handle_revise_race_rejects_negative_experience() {
        // Arrange
        let races: InMemoryRepository<RaceRecord> = InMemoryRepository::new();
        let race_id = seeded_race(&races).await;
        let command = ReviseRace {
            correlation_id: Uuid::new_v4(),
            race_id,
            experience_points: Some(-40),
            ..ReviseRace::default()
        };

        // Act
        let result = handle_revise_race(&command, &races).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(stored_race(&races, race_id).await.experience_points(), 0);
    }

    #[tokio::test]
    async fn test_handle_revise_race_returns_not_found_for_unknown_race() {
        // Arrange
        let races: InMemoryRepository<RaceRecord> = InMemoryRepository::new();
        let race_id = Uuid::new_v4();
        let command = ReviseRace {
            correlation_id: Uuid::new_v4(),
            race_id,
            ..ReviseRace::default()
        };

        // Act
        let result = handle_revise_race(&command, &races).await;

        // Assert
        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, race_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_add_body_part_appends_to_existing_parts() {
        // Arrange
        let races: InMemoryRepository<RaceRecord> = InMemoryRepository::new();
        let race_id = seeded_race(&races).await;
        for name in ["Head", "Tail"] {
            let command = AddBodyPart {
                correlation_id: Uuid::new_v4(),
                race_id,
                body_part: BodyPart::new(name, BodyPartCategory::Other, 1).unwrap(),
            };

            // Act
            handle_add_body_part(&command, &races).await.unwrap();
        }

        // Assert
        let race = stored_race(&races, race_id).await;
        let names: Vec<&str> = race.body_parts().iter().map(BodyPart::name).collect();
        assert_eq!(names, vec!["Head", "Tail"]);
    }

    #[tokio::test]
    async fn test_handle_add_currency_rejects_taken_level() {
        // Arrange
        let groups: InMemoryRepository<CurrencyGroupRecord> = InMemoryRepository::new();
        let currency_group_id = seeded_group(&groups).await;
        let command = AddCurrency {
            correlation_id: Uuid::new_v4(),
            currency_group_id,
            currency: SingleCurrency::new("Platinum", "pp", 1, 1000).unwrap(),
        };

        // Act
        let result = handle_add_currency(&command, &groups).await;

        // Assert
        match result.unwrap_err() {
            DomainError::State(msg) => assert!(msg.contains("already taken")),
            other => panic!("expected State, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_add_currency_appends_new_level() {
        // Arrange
        let groups: InMemoryRepository<CurrencyGroupRecord> = InMemoryRepository::new();
        let currency_group_id = seeded_group(&groups).await;
        let command = AddCurrency {
            correlation_id: Uuid::new_v4(),
            currency_group_id,
            currency: SingleCurrency::new("Iron", "ip", 4, 1).unwrap(),
        };

        // Act
        let result = handle_add_currency(&command, &groups).await.unwrap();

        // Assert
        assert_eq!(result.record.currencies.len(), 4);
    }

    #[tokio::test]
    async fn test_handle_grant_treasure_binds_an_empty_treasure() {
        // Arrange
        let races: InMemoryRepository<RaceRecord> = InMemoryRepository::new();
        let groups: InMemoryRepository<CurrencyGroupRecord> = InMemoryRepository::new();

        // Act
        let (race_id, currency_group_id) = seeded_race_with_treasure(&races, &groups).await;

        // Assert
        let race = stored_race(&races, race_id).await;
        let treasure = race.treasure().unwrap();
        assert_eq!(treasure.currency_group_id(), currency_group_id);
        assert!(treasure.is_empty());
        assert_eq!(treasure.coins().len(), 3);
    }

    #[tokio::test]
    async fn test_handle_grant_treasure_again_resets_balances() {
        // Arrange
        let races: InMemoryRepository<RaceRecord> = InMemoryRepository::new();
        let groups: InMemoryRepository<CurrencyGroupRecord> = InMemoryRepository::new();
        let (race_id, currency_group_id) = seeded_race_with_treasure(&races, &groups).await;
        let deposit = DepositCoins {
            correlation_id: Uuid::new_v4(),
            race_id,
            hierarchy_level: 1,
            amount: 9,
        };
        handle_deposit_coins(&deposit, &races, &groups).await.unwrap();
        let regrant = GrantTreasure {
            correlation_id: Uuid::new_v4(),
            race_id,
            currency_group_id,
        };

        // Act
        handle_grant_treasure(&regrant, &races, &groups).await.unwrap();

        // Assert
        assert!(stored_race(&races, race_id).await.treasure().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handle_deposit_and_withdraw_coins() {
        // Arrange
        let races: InMemoryRepository<RaceRecord> = InMemoryRepository::new();
        let groups: InMemoryRepository<CurrencyGroupRecord> = InMemoryRepository::new();
        let (race_id, _) = seeded_race_with_treasure(&races, &groups).await;
        let deposit = DepositCoins {
            correlation_id: Uuid::new_v4(),
            race_id,
            hierarchy_level: 2,
            amount: 12,
        };
        let withdraw = WithdrawCoins {
            correlation_id: Uuid::new_v4(),
            race_id,
            hierarchy_level: 2,
            amount: 5,
        };

        // Act
        handle_deposit_coins(&deposit, &races, &groups).await.unwrap();
        handle_withdraw_coins(&withdraw, &races, &groups).await.unwrap();

        // Assert
        let race = stored_race(&races, race_id).await;
        assert_eq!(race.treasure().unwrap().coin_quantity(2), 7);
    }

    #[tokio::test]
    async fn test_handle_withdraw_coins_rejects_overdraft() {
        // Arrange
        let races: InMemoryRepository<RaceRecord> = InMemoryRepository::new();
        let groups: InMemoryRepository<CurrencyGroupRecord> = InMemoryRepository::new();
        let (race_id, _) = seeded_race_with_treasure(&races, &groups).await;
        let deposit = DepositCoins {
            correlation_id: Uuid::new_v4(),
            race_id,
            hierarchy_level: 3,
            amount: 4,
        };
        handle_deposit_coins(&deposit, &races, &groups).await.unwrap();
        let withdraw = WithdrawCoins {
            correlation_id: Uuid::new_v4(),
            race_id,
            hierarchy_level: 3,
            amount: 5,
        };

        // Act
        let result = handle_withdraw_coins(&withdraw, &races, &groups).await;

        // Assert
        match result.unwrap_err() {
            DomainError::State(msg) => assert!(msg.starts_with("insufficient funds")),
            other => panic!("expected State, got {other:?}"),
        }
        let race = stored_race(&races, race_id).await;
        assert_eq!(race.treasure().unwrap().coin_quantity(3), 4);
    }

    #[tokio::test]
    async fn test_handle_deposit_coins_rejects_unknown_level() {
        // Arrange
        let races: InMemoryRepository<RaceRecord> = InMemoryRepository::new();
        let groups: InMemoryRepository<CurrencyGroupRecord> = InMemoryRepository::new();
        let (race_id, _) = seeded_race_with_treasure(&races, &groups).await;
        let deposit = DepositCoins {
            correlation_id: Uuid::new_v4(),
            race_id,
            hierarchy_level: 9,
            amount: 1,
        };

        // Act
        let result = handle_deposit_coins(&deposit, &races, &groups).await;

        // Assert
        match result.unwrap_err() {
            DomainError::State(msg) => assert!(msg.contains("does not exist")),
            other => panic!("expected State, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_deposit_coins_requires_treasure() {
        // Arrange
        let races: InMemoryRepository<RaceRecord> = InMemoryRepository::new();
        let groups: InMemoryRepository<CurrencyGroupRecord> = InMemoryRepository::new();
        let race_id = seeded_race(&races).await;
        let deposit = DepositCoins {
            correlation_id: Uuid::new_v4(),
            race_id,
            hierarchy_level: 1,
            amount: 1,
        };

        // Act
        let result = handle_deposit_coins(&deposit, &races, &groups).await;

        // Assert
        match result.unwrap_err() {
            DomainError::State(msg) => assert!(msg.ends_with("has no treasure")),
            other => panic!("expected State, got {other:?}"),
        }
    }
}
