//! HR admin - schema migration and seeding entry point
//!
//! CLI-based entry point that dispatches to the migrate and seed commands.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hr_admin::{
    cli::{Cli, Commands},
    commands,
    config::Config,
};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing (verbose mode sets debug level)
    init_tracing(cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::MigrateGenerate(args) => commands::generate::migration(args),
        Commands::SeedGenerate(args) => commands::generate::seed(args),
        command => match Config::load(cli.env, cli.config.as_deref()) {
            Ok(config) => {
                tracing::debug!(?config, "Configuration loaded");
                commands::execute(command, config).await
            }
            Err(e) => Err(e),
        },
    };

    // Handle errors
    if let Err(e) = result {
        tracing::error!(code = e.code(), "Command failed: {}", e);
        // Printed regardless of the log filter
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber
///
/// Logs go to stderr; stdout carries command output.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
