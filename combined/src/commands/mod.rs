//! Commands module - CLI command implementations.
//!
//! Each command family is implemented in its own module.

pub mod generate;
pub mod migrate;
pub mod seed;

use common::{AppError, AppResult};
use migration::{MigrationError, RunReport, Runner, RunnerConfig, UnitState, UnitStatus};
use migration::{Direction, Registry};

use crate::cli::Commands;
use crate::config::Config;
use crate::db;

/// Dispatch a parsed command
pub async fn execute(command: Commands, config: Config) -> AppResult<()> {
    match command {
        Commands::MigrateUp(args) => migrate::up(args, &config).await,
        Commands::MigrateDown(args) => migrate::down(args, &config).await,
        Commands::MigrateStatus(args) => migrate::status(args, &config).await,
        Commands::MigrateGenerate(args) => generate::migration(args),
        Commands::SeedUp => seed::up(&config).await,
        Commands::SeedDown(args) => seed::down(args, &config).await,
        Commands::SeedStatus(args) => seed::status(args, &config).await,
        Commands::SeedGenerate(args) => generate::seed(args),
    }
}

/// Connect and build a runner over `registry`.
async fn runner(config: &Config, runner_config: RunnerConfig, registry: Registry) -> AppResult<Runner> {
    let db = db::connect(config).await?;
    Ok(Runner::new(db, runner_config, registry))
}

/// Log the failing unit, then hand the error to the binary.
fn unit_failure(err: MigrationError) -> AppError {
    if let Some(identity) = err.failed_identity() {
        tracing::error!(%identity, "Run stopped");
    }
    AppError::from(err)
}

/// One line per unit the run touched.
pub fn render_report(report: &RunReport) -> String {
    let verb = match report.direction {
        Direction::Up => "Applied",
        Direction::Down => "Reverted",
    };

    if report.is_empty() {
        return match report.direction {
            Direction::Up => "Nothing to apply".to_string(),
            Direction::Down => "Nothing to revert".to_string(),
        };
    }

    report
        .completed
        .iter()
        .map(|id| format!("{}: {}", verb, id))
        .chain(
            report
                .skipped
                .iter()
                .map(|id| format!("Skipped: {} (handled by another runner)", id)),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

/// Status listing, as text or JSON.
pub fn render_status(statuses: &[UnitStatus], json: bool) -> AppResult<String> {
    if json {
        return serde_json::to_string_pretty(statuses)
            .map_err(|e| AppError::internal(format!("Cannot encode status: {}", e)));
    }

    Ok(statuses
        .iter()
        .map(|status| {
            let state = match &status.state {
                UnitState::Applied { applied_at } => {
                    format!("applied ({})", applied_at.format("%Y-%m-%d %H:%M:%S UTC"))
                }
                UnitState::Pending => "pending".to_string(),
                UnitState::Missing { applied_at } => format!(
                    "missing (applied {}, no longer registered)",
                    applied_at.format("%Y-%m-%d %H:%M:%S UTC")
                ),
            };
            format!("{}: {}", status.identity, state)
        })
        .collect::<Vec<_>>()
        .join("\n"))
}
