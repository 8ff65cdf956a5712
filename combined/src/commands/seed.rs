//! Seed commands - Reference data management.

use common::AppResult;
use migration::{RunnerConfig, Seeder};

use super::{render_report, render_status, runner, unit_failure};
use crate::cli::args::{SeedDownArgs, StatusArgs};
use crate::config::Config;

pub async fn up(config: &Config) -> AppResult<()> {
    let runner = runner(config, RunnerConfig::seeds(&config.tracking), Seeder::registry()?).await?;

    tracing::info!("Running pending seeds...");
    let report = runner.apply_pending().await.map_err(unit_failure)?;
    println!("{}", render_report(&report));
    tracing::info!(applied = report.completed.len(), "Seeding completed successfully");
    Ok(())
}

/// Revert seeds; every applied seed unless `--count` is given.
pub async fn down(args: SeedDownArgs, config: &Config) -> AppResult<()> {
    let runner = runner(config, RunnerConfig::seeds(&config.tracking), Seeder::registry()?).await?;

    let report = match args.count {
        Some(count) => {
            tracing::info!(count, "Reverting seeds...");
            runner.revert(count).await
        }
        None => {
            tracing::info!("Reverting all seeds...");
            runner.revert_all().await
        }
    }
    .map_err(unit_failure)?;

    println!("{}", render_report(&report));
    Ok(())
}

pub async fn status(args: StatusArgs, config: &Config) -> AppResult<()> {
    let runner = runner(config, RunnerConfig::seeds(&config.tracking), Seeder::registry()?).await?;

    let statuses = runner.status().await?;
    println!("{}", render_status(&statuses, args.json)?);
    Ok(())
}
