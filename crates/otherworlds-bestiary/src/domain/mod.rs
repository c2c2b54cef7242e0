//! Domain model for the Bestiary context.

pub mod anatomy;
pub mod builder;
pub mod commands;
pub mod currency;
pub mod dice;
pub mod race;
pub mod taxonomy;
pub mod treasure;
