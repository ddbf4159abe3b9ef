//! Fleet Logistics CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run shipments API database migrations
//! fleet-cli migrate api
//!
//! # Run dashboard database migrations (client state + sessions)
//! fleet-cli migrate dashboard
//!
//! # Run all database migrations
//! fleet-cli migrate all
//!
//! # Insert demo shipments into an empty API database
//! fleet-cli seed
//!
//! # Replace all shipments with the demo set
//! fleet-cli seed --force
//!
//! # Register a Staff account for the dashboard
//! fleet-cli user create -e dispatcher@fleet.test -p secret
//! ```
//!
//! Database locations come from the same environment variables the servers
//! read (`FLEET_API_DATABASE_URL`, `DASHBOARD_DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fleet-cli")]
#[command(author, version, about = "Fleet Logistics CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Insert the demo shipments
    Seed {
        /// Delete existing shipments first
        #[arg(long)]
        force: bool,
    },
    /// Manage dashboard accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run shipments API database migrations
    Api,
    /// Run dashboard database migrations
    Dashboard,
    /// Run all database migrations
    All,
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a Staff account (same rules as signup)
    Create {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Plaintext password (mock authentication)
        #[arg(short, long)]
        password: String,

        /// Display name (defaults to the email's local part)
        #[arg(short, long)]
        username: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Api => commands::migrate::api().await?,
            MigrateTarget::Dashboard => commands::migrate::dashboard().await?,
            MigrateTarget::All => {
                commands::migrate::api().await?;
                commands::migrate::dashboard().await?;
            }
        },
        Commands::Seed { force } => commands::seed::demo(force).await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                password,
                username,
            } => {
                commands::user::create(&email, &password, username.as_deref()).await?;
            }
        },
    }
    Ok(())
}
