//! Maison CLI - Provisioning and seeding tools.
//!
//! # Usage
//!
//! ```bash
//! # Idempotently ensure the fixed admin account exists and holds the role
//! maison-cli admin ensure
//!
//! # Pre-seed the singleton site-settings rows
//! maison-cli seed settings
//! ```
//!
//! # Commands
//!
//! - `admin ensure` - Provision the fixed admin account
//! - `seed settings` - Insert missing site-settings rows

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "maison-cli")]
#[command(author, version, about = "Maison CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the admin account
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed backend tables
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Ensure the fixed admin account exists and holds the admin role
    Ensure,
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert missing site-settings rows
    Settings,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
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
        Commands::Admin { action } => match action {
            AdminAction::Ensure => commands::admin::ensure().await?,
        },
        Commands::Seed { target } => match target {
            SeedTarget::Settings => commands::seed::settings().await?,
        },
    }
    Ok(())
}
