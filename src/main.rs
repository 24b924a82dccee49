//! # MotorVault Main Entry Point
//!
//! Boots the storage and service management API: configuration, tracing,
//! database pool, migrations, seed data, then the HTTP server.

use clap::Parser;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;

use motorvault::{config::ConfigLoader, db, seeds, server::run_server, telemetry};

#[derive(Debug, Parser)]
#[command(name = "motorvault", about = "Vehicle storage and service management API")]
struct Cli {
    /// Run pending migrations and exit without serving
    #[arg(long)]
    migrate_only: bool,

    /// Skip demo fixture seeding regardless of configuration
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_loader = ConfigLoader::new();
    let mut config = config_loader.load()?;
    if cli.no_seed {
        config.seed_fixtures = false;
    }
    config.validate()?;

    telemetry::init_tracing(&config)?;
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::info!(profile = %config.profile, config = %redacted_json, "Configuration loaded");
    }

    let db = db::init_pool(&config).await?;
    Migrator::up(&db, None).await?;
    tracing::info!("Migrations applied");

    if cli.migrate_only {
        return Ok(());
    }

    let shared = Arc::new(db.clone());
    seeds::seed_if_empty(&shared, &config).await?;

    run_server(config, db).await
}
