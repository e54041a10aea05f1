//! Subcommand implementations.

pub mod config;
pub mod filter;
pub mod reservations;
pub mod session;
