//! CLI module
//!
//! Command-line interface for operating the proxy client.
//!
//! # Commands
//!
//! - `check` - Validate configuration and probe upstream connectivity
//! - `info` - Show client capabilities and auth diagnostics
//! - `current` - Get current weather conditions for a city
//! - `forecast` - Get a multi-day forecast
//! - `search` - Search for cities by name

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
