//! HR admin database tooling.
//!
//! Library half of the `hr-admin` binary:
//! - `cli` - argument definitions
//! - `commands` - one module per command family
//! - `config` - environment and connection resolution
//! - `templates` - unit file generation

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod templates;
