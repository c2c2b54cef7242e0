//! Storage records for the Bestiary context and their mapping to the
//! domain model.

pub mod mapper;
pub mod record;
mod stored;
