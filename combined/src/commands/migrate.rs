//! Migrate commands - Schema migration management.

use common::AppResult;
use migration::{Migrator, RunnerConfig};

use super::{render_report, render_status, runner, unit_failure};
use crate::cli::args::{MigrateDownArgs, MigrateUpArgs, StatusArgs};
use crate::config::Config;

/// Apply pending migrations, optionally stopping at `--to`.
pub async fn up(args: MigrateUpArgs, config: &Config) -> AppResult<()> {
    let runner = runner(config, RunnerConfig::migrations(&config.tracking), Migrator::registry()?).await?;

    let target = args
        .to
        .as_deref()
        .map(|name| runner.registry().find(name))
        .transpose()?;

    match &target {
        Some(target) => tracing::info!(identity = %target, "Running migrations up to target..."),
        None => tracing::info!("Running pending migrations..."),
    }

    let report = runner
        .apply_to(target.as_ref())
        .await
        .map_err(unit_failure)?;
    println!("{}", render_report(&report));
    tracing::info!(applied = report.completed.len(), "Migrations completed successfully");
    Ok(())
}

/// Revert the most recent migrations.
pub async fn down(args: MigrateDownArgs, config: &Config) -> AppResult<()> {
    let runner = runner(config, RunnerConfig::migrations(&config.tracking), Migrator::registry()?).await?;

    let report = if args.all {
        tracing::warn!("Reverting every applied migration...");
        runner.revert_all().await
    } else {
        tracing::info!(count = args.count, "Rolling back migrations...");
        runner.revert(args.count).await
    }
    .map_err(unit_failure)?;

    println!("{}", render_report(&report));
    tracing::info!(reverted = report.completed.len(), "Rollback completed successfully");
    Ok(())
}

/// Show every migration with its state.
pub async fn status(args: StatusArgs, config: &Config) -> AppResult<()> {
    let runner = runner(config, RunnerConfig::migrations(&config.tracking), Migrator::registry()?).await?;

    tracing::info!("Checking migration status...");
    let statuses = runner.status().await?;
    println!("{}", render_status(&statuses, args.json)?);
    Ok(())
}
