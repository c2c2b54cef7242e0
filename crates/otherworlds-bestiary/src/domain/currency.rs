//! Currencies and currency groups.
//!
//! A currency group is a set of denominations ranked by hierarchy level,
//! level 1 being the most valuable. Every denomination carries an exchange
//! rate into the group's base unit.

use std::fmt;

use otherworlds_core::error::DomainError;
use uuid::Uuid;

/// Rank of a denomination inside its group; 1 is the highest value.
pub type HierarchyLevel = u32;

/// A single denomination, e.g. "Gold Crown" (`gc`) at level 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleCurrency {
    id: Uuid,
    name: String,
    short_name: String,
    hierarchy_level: HierarchyLevel,
    exchange_rate: u64,
}

impl SingleCurrency {
    /// Creates a denomination with a fresh identity.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a name is blank, the level is 0,
    /// or the exchange rate is 0.
    pub fn new(
        name: impl Into<String>,
        short_name: impl Into<String>,
        hierarchy_level: HierarchyLevel,
        exchange_rate: u64,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let short_name = short_name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("currency name must not be empty"));
        }
        if short_name.trim().is_empty() {
            return Err(DomainError::validation(
                "currency short name must not be empty",
            ));
        }
        if hierarchy_level == 0 {
            return Err(DomainError::validation(
                "currency hierarchy level must be at least 1",
            ));
        }
        if exchange_rate == 0 {
            return Err(DomainError::validation(
                "currency exchange rate must be greater than 0",
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            short_name,
            hierarchy_level,
            exchange_rate,
        })
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

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    #[must_use]
    pub fn hierarchy_level(&self) -> HierarchyLevel {
        self.hierarchy_level
    }

    /// Base units one coin of this denomination is worth.
    #[must_use]
    pub fn exchange_rate(&self) -> u64 {
        self.exchange_rate
    }
}

/// A named set of denominations with unique hierarchy levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyGroup {
    id: Uuid,
    name: String,
    currencies: Vec<SingleCurrency>,
}

impl CurrencyGroup {
    /// Creates a group from an initial list of denominations.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is blank and
    /// `DomainError::State` if two denominations share a hierarchy level.
    pub fn new(
        name: impl Into<String>,
        currencies: Vec<SingleCurrency>,
    ) -> Result<Self, DomainError> {
        let mut group = Self {
            id: Uuid::new_v4(),
            name: String::new(),
            currencies: Vec::with_capacity(currencies.len()),
        };
        group.set_group_name(name)?;
        for currency in currencies {
            group.add_currency(currency)?;
        }
        Ok(group)
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

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Denominations in insertion order.
    #[must_use]
    pub fn currencies(&self) -> &[SingleCurrency] {
        &self.currencies
    }

    /// Denominations ordered from the highest rank (level 1) downwards.
    #[must_use]
    pub fn currencies_by_rank(&self) -> Vec<&SingleCurrency> {
        let mut ranked: Vec<&SingleCurrency> = self.currencies.iter().collect();
        ranked.sort_by_key(|c| c.hierarchy_level);
        ranked
    }

    /// Hierarchy levels present in the group, ascending.
    pub fn levels(&self) -> impl Iterator<Item = HierarchyLevel> + '_ {
        self.currencies_by_rank()
            .into_iter()
            .map(SingleCurrency::hierarchy_level)
    }

    /// Renames the group.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `name` is empty or whitespace.
    pub fn set_group_name(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation(
                "currency group name must not be empty",
            ));
        }
        self.name = name;
        Ok(())
    }

    /// Appends a denomination.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::State` if a member already occupies the same
    /// hierarchy level.
    pub fn add_currency(&mut self, currency: SingleCurrency) -> Result<(), DomainError> {
        if let Some(existing) = self.by_level(currency.hierarchy_level) {
            return Err(DomainError::state(format!(
                "hierarchy level {} is already taken by {} in currency group {}",
                currency.hierarchy_level, existing.name, self.name
            )));
        }
        self.currencies.push(currency);
        Ok(())
    }

    /// Removes the first member equal to `currency`. A miss removes nothing.
    pub fn remove_currency(&mut self, currency: &SingleCurrency) -> Option<SingleCurrency> {
        self.remove_first(|c| c == currency)
    }

    /// Removes the first member with the given name. A miss removes nothing.
    pub fn remove_by_name(&mut self, name: &str) -> Option<SingleCurrency> {
        self.remove_first(|c| c.name == name)
    }

    /// Removes the member at `level`. A miss removes nothing.
    pub fn remove_by_level(&mut self, level: HierarchyLevel) -> Option<SingleCurrency> {
        self.remove_first(|c| c.hierarchy_level == level)
    }

    /// Looks up the member at `level`.
    #[must_use]
    pub fn by_level(&self, level: HierarchyLevel) -> Option<&SingleCurrency> {
        self.currencies.iter().find(|c| c.hierarchy_level == level)
    }

    /// Whether a member occupies `level`.
    #[must_use]
    pub fn has_level(&self, level: HierarchyLevel) -> bool {
        self.by_level(level).is_some()
    }

    /// Value of `quantity` coins at `level`, in base units. Unknown levels
    /// are worth nothing.
    #[must_use]
    pub fn value_in_base_units(&self, level: HierarchyLevel, quantity: u64) -> u128 {
        self.by_level(level).map_or(0, |c| {
            u128::from(quantity) * u128::from(c.exchange_rate)
        })
    }

    fn remove_first(
        &mut self,
        predicate: impl Fn(&SingleCurrency) -> bool,
    ) -> Option<SingleCurrency> {
        let index = self.currencies.iter().position(predicate)?;
        Some(self.currencies.remove(index))
    }
}

impl fmt::Display for CurrencyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        for currency in self.currencies_by_rank() {
            write!(
                f,
                " [{}] {} ({}) = {}",
                currency.hierarchy_level,
                currency.name,
                currency.short_name,
                currency.exchange_rate
            )?;
        }
        Ok(())
    }
}
