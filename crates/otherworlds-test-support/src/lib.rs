//! Shared test mocks and utilities for the Otherworlds RPG engine.

mod repository;
mod rng;

pub use repository::{FailingRepository, InMemoryRepository};
pub use rng::{MockRng, SequenceRng};
