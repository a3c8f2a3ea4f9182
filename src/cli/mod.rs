//! CLI module
//!
//! Command-line interface for running the connectors.
//!
//! # Commands
//!
//! - `jobber` - Pickers, client/property listings and paginated queries
//! - `reform` - Field extraction from documents or text
//! - `list` - List built-in connectors

mod commands;
mod runner;

pub use commands::{Cli, Commands, JobberCommand, QueryArgs, ReformCommand};
pub use runner::Runner;
