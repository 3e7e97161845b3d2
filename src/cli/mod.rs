//! CLI module
//!
//! Single no-argument entry point. Optional flags point at a config file
//! or relax TLS verification.

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::Runner;
