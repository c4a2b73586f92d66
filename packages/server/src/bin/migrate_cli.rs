//! CLI for running schema migrations outside the server boot path.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Parser)]
#[command(name = "migrate_cli")]
#[command(about = "Schema migration CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database to migrate
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply all pending migrations
    Run,

    /// List known migrations
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            let pool = PgPoolOptions::new()
                .max_connections(1)
                .connect(&cli.database_url)
                .await
                .context("Failed to connect to database")?;

            MIGRATOR
                .run(&pool)
                .await
                .context("Failed to run migrations")?;

            println!("migrations applied");
        }
        Commands::Info => {
            for migration in MIGRATOR.iter() {
                println!("{:>4}  {}", migration.version, migration.description);
            }
        }
    }

    Ok(())
}
