//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use common::Environment;

/// HR admin - schema migrations and reference data for the HR database
#[derive(Parser, Debug)]
#[command(name = "hr-admin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Environment selecting the connection settings
    #[arg(
        short,
        long,
        global = true,
        env = "APP_ENV",
        default_value = common::constants::DEFAULT_ENVIRONMENT
    )]
    pub env: Environment,

    /// Per-environment database config file (JSON)
    #[arg(short, long, global = true, env = "DATABASE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending schema migrations
    #[command(name = "migrate:up")]
    MigrateUp(MigrateUpArgs),

    /// Revert the most recent schema migrations
    #[command(name = "migrate:down")]
    MigrateDown(MigrateDownArgs),

    /// Show schema migration status
    #[command(name = "migrate:status")]
    MigrateStatus(StatusArgs),

    /// Generate a new schema migration file
    #[command(name = "migrate:generate")]
    MigrateGenerate(GenerateArgs),

    /// Apply pending seeds
    #[command(name = "seed:up")]
    SeedUp,

    /// Revert applied seeds
    #[command(name = "seed:down")]
    SeedDown(SeedDownArgs),

    /// Show seed status
    #[command(name = "seed:status")]
    SeedStatus(StatusArgs),

    /// Generate a new seed file
    #[command(name = "seed:generate")]
    SeedGenerate(GenerateArgs),
}

/// Arguments for `migrate:up`
#[derive(Args, Debug)]
pub struct MigrateUpArgs {
    /// Stop after this migration (inclusive)
    #[arg(long, value_name = "IDENTITY")]
    pub to: Option<String>,
}

/// Arguments for `migrate:down`
#[derive(Args, Debug)]
pub struct MigrateDownArgs {
    /// Number of migrations to revert
    #[arg(long, default_value_t = 1, conflicts_with = "all")]
    pub count: usize,

    /// Revert every applied migration
    #[arg(long)]
    pub all: bool,
}

/// Arguments for `seed:down`
#[derive(Args, Debug)]
pub struct SeedDownArgs {
    /// Number of seeds to revert (default: all applied)
    #[arg(long)]
    pub count: Option<usize>,
}

/// Arguments for the status commands
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the generate commands
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Unit description (e.g., "create_payroll_table")
    pub name: String,

    /// Directory to write the file into
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}
