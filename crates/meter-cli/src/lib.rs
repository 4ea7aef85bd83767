//! Session meter CLI library.
//!
//! This crate provides the `meter` command-line interface: argument parsing,
//! layered configuration and shell rendering on top of `meter-core`.

mod cli;
pub mod commands;
pub mod config;
pub mod output;

pub use cli::{Cli, Commands};
