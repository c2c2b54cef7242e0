//! Otherworlds Core — shared domain abstractions.
//!
//! This crate defines the error type, command and repository seams, and the
//! dice-rolling randomness trait that the bounded contexts depend on. It
//! contains no infrastructure code.

pub mod command;
pub mod error;
pub mod repository;
pub mod rng;
