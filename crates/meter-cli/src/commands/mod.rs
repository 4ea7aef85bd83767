//! Subcommand implementations.

pub mod context;
pub mod transcript;
