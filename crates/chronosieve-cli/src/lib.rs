//! Chronosieve CLI library.
//!
//! This library provides the core functionality for the `chronosieve`
//! command-line interface: corpus files, configuration, command execution
//! and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod corpus;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use corpus::Corpus;
pub use error::{CliError, Result};
pub use output::Formatter;
