//! Tooling & Integration Layer
//!
//! Command-line entry points over the project API and configuration.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, ConfigCommands, ProjectCommands};
