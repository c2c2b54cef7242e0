//! Application layer for the Bestiary context.

pub mod command_handlers;
pub mod query_handlers;
