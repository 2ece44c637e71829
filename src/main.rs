use anyhow::Result;
use clap::{Parser, Subcommand};
use tenancy_core::{config::Config, migration, server, telemetry};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "tenancy-core",
    version,
    about = "Multitenant backend serving master and tenant databases"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run migrations and serve HTTP (default)
    Serve,
    /// Run master, session and tenant migrations, then exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    telemetry::init(&config.telemetry);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            info!(
                environment = ?config.environment,
                "Starting Tenancy Core on {}",
                config.http_addr()
            );
            server::run(config).await
        }
        Commands::Migrate => {
            info!("Running migrations");
            migration::run_migrations(&config).await
        }
    }
}
