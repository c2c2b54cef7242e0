//! Treasure: a coin ledger bound to a currency group.
//!
//! A treasure does not own its currency group; it remembers the group's
//! identifier and every operation that needs denomination data is handed
//! the group by reference. Handing in a different group than the bound one
//! is a state error.

use std::collections::BTreeMap;
use std::fmt;

use otherworlds_core::error::DomainError;
use uuid::Uuid;

use super::currency::{CurrencyGroup, HierarchyLevel};

/// Coin quantities per hierarchy level.
pub type CoinLedger = BTreeMap<HierarchyLevel, u64>;

/// A payoff of coins drawn from one currency group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Treasure {
    id: Uuid,
    currency_group_id: Uuid,
    coins: CoinLedger,
}

impl Treasure {
    /// Creates an empty treasure bound to `group`, with a zero balance for
    /// every level the group currently has.
    #[must_use]
    pub fn new(group: &CurrencyGroup) -> Self {
        Self {
            id: Uuid::new_v4(),
            currency_group_id: group.id(),
            coins: zeroed_ledger(group),
        }
    }

    /// Assigns a known identity, e.g. when rehydrating from storage.
    #[must_use]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Identifier of the bound currency group.
    #[must_use]
    pub fn currency_group_id(&self) -> Uuid {
        self.currency_group_id
    }

    /// Current ledger, ordered by level.
    #[must_use]
    pub fn coins(&self) -> &CoinLedger {
        &self.coins
    }

    /// Quantity held at `level` (zero when the level is not in the ledger).
    #[must_use]
    pub fn coin_quantity(&self, level: HierarchyLevel) -> u64 {
        self.coins.get(&level).copied().unwrap_or(0)
    }

    /// Whether every balance is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coins.values().all(|&quantity| quantity == 0)
    }

    /// Adds `amount` coins at `level`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::State` if `group` is not the bound group or the
    /// level does not exist in it, and `DomainError::Validation` if the
    /// balance would overflow.
    pub fn add_coins(
        &mut self,
        group: &CurrencyGroup,
        level: HierarchyLevel,
        amount: u64,
    ) -> Result<(), DomainError> {
        self.ensure_bound_to(group)?;
        ensure_level_exists(group, level)?;

        let balance = self.coins.entry(level).or_insert(0);
        *balance = balance.checked_add(amount).ok_or_else(|| {
            DomainError::validation(format!("coin quantity at level {level} would overflow"))
        })?;
        Ok(())
    }

    /// Removes `amount` coins from `level`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::State` if `group` is not the bound group, the
    /// level does not exist in it, or the balance is insufficient. The balance
    /// is left unchanged on error.
    pub fn remove_coins(
        &mut self,
        group: &CurrencyGroup,
        level: HierarchyLevel,
        amount: u64,
    ) -> Result<(), DomainError> {
        self.ensure_bound_to(group)?;
        ensure_level_exists(group, level)?;

        let balance = self.coin_quantity(level);
        if balance < amount {
            return Err(DomainError::state(format!(
                "insufficient funds at level {level}: have {balance}, need {amount}"
            )));
        }
        self.coins.insert(level, balance - amount);
        Ok(())
    }

    /// Overwrites balances in bulk. Entries for levels the group does not
    /// have are ignored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::State` if `group` is not the bound group.
    pub fn set_coin_quantities(
        &mut self,
        group: &CurrencyGroup,
        quantities: impl IntoIterator<Item = (HierarchyLevel, u64)>,
    ) -> Result<(), DomainError> {
        self.ensure_bound_to(group)?;
        for (level, quantity) in quantities {
            if group.has_level(level) {
                self.coins.insert(level, quantity);
            }
        }
        Ok(())
    }

    /// Sets every balance to zero.
    pub fn reset_coins(&mut self) {
        for quantity in self.coins.values_mut() {
            *quantity = 0;
        }
    }

    /// Rebinds the treasure to `group`. All previous balances are discarded
    /// and every level of the new group starts at zero.
    pub fn set_currency_group(&mut self, group: &CurrencyGroup) {
        self.currency_group_id = group.id();
        self.coins = zeroed_ledger(group);
    }

    /// Total worth in base units: Σ quantity × exchange rate.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::State` if `group` is not the bound group.
    pub fn total_value_in_base_units(&self, group: &CurrencyGroup) -> Result<u128, DomainError> {
        self.ensure_bound_to(group)?;
        Ok(self
            .coins
            .iter()
            .map(|(&level, &quantity)| group.value_in_base_units(level, quantity))
            .sum())
    }

    /// Renders the ledger with the group's short names, e.g. `5 gc, 3 sc`.
    #[must_use]
    pub fn display_with<'a>(&'a self, group: &'a CurrencyGroup) -> TreasureDisplay<'a> {
        TreasureDisplay {
            treasure: self,
            group,
        }
    }

    fn ensure_bound_to(&self, group: &CurrencyGroup) -> Result<(), DomainError> {
        if group.id() == self.currency_group_id {
            Ok(())
        } else {
            Err(DomainError::state(format!(
                "treasure {} is bound to currency group {}, not {}",
                self.id,
                self.currency_group_id,
                group.id()
            )))
        }
    }
}

fn zeroed_ledger(group: &CurrencyGroup) -> CoinLedger {
    group.levels().map(|level| (level, 0)).collect()
}

fn ensure_level_exists(group: &CurrencyGroup, level: HierarchyLevel) -> Result<(), DomainError> {
    if group.has_level(level) {
        Ok(())
    } else {
        Err(DomainError::state(format!(
            "level {level} does not exist in currency group {}",
            group.name()
        )))
    }
}

const EMPTY_MARKER: &str = "empty";

impl fmt::Display for Treasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(EMPTY_MARKER);
        }
        let entries: Vec<String> = self
            .coins
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .map(|(level, quantity)| format!("{quantity} x L{level}"))
            .collect();
        f.write_str(&entries.join(", "))
    }
}

/// Display adapter pairing a treasure with its currency group.
#[derive(Debug)]
pub struct TreasureDisplay<'a> {
    treasure: &'a Treasure,
    group: &'a CurrencyGroup,
}

impl fmt::Display for TreasureDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.treasure.is_empty() {
            return f.write_str(EMPTY_MARKER);
        }
        let entries: Vec<String> = self
            .treasure
            .coins
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .map(|(&level, quantity)| match self.group.by_level(level) {
                Some(currency) => format!("{quantity} {}", currency.short_name()),
                None => format!("{quantity} x L{level}"),
            })
            .collect();
        f.write_str(&entries.join(", "))
    }
}
