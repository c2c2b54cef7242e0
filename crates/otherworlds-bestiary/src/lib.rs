//! Otherworlds RPG — Bestiary bounded context.
//!
//! Responsible for creature races: anatomy, combat statistics, and the
//! treasure a race carries, valued in hierarchical currency groups.

pub mod application;
pub mod domain;
pub mod persistence;
