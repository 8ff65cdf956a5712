//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `migrate:*` - Schema migrations
//! - `seed:*` - Reference data

pub mod args;

pub use args::{Cli, Commands};
