//! Generate commands - New unit files.

use chrono::Utc;
use common::AppResult;
use migration::UnitKind;

use crate::cli::args::GenerateArgs;
use crate::config::default_unit_dir;
use crate::templates;

/// Write a new schema migration file
pub fn migration(args: GenerateArgs) -> AppResult<()> {
    generate(UnitKind::Schema, args, "Migrator::migrations()")
}

/// Write a new seed file
pub fn seed(args: GenerateArgs) -> AppResult<()> {
    generate(UnitKind::Seed, args, "Seeder::seeds() (wrapped in Seed(..))")
}

fn generate(kind: UnitKind, args: GenerateArgs, register_in: &str) -> AppResult<()> {
    let dir = args
        .dir
        .unwrap_or_else(|| default_unit_dir(kind == UnitKind::Seed));

    tracing::info!(%kind, name = %args.name, "Generating unit");
    let path = templates::generate_unit(kind, &args.name, &dir, Utc::now())?;

    println!("Created: {}", path.display());
    println!("Don't forget to declare the module and register it in {}!", register_in);
    Ok(())
}
