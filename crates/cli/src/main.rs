//! LoanMitra CLI - migrations and one-shot maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Run document-store schema migrations
//! lm-cli migrate
//!
//! # Seed a superuser email
//! lm-cli seed superuser -e root@loanmitra.in
//!
//! # Copy collections between two store instances
//! lm-cli copy --source postgres://... --dest postgres://... -c agents -c leads
//!
//! # Re-key admin_users documents by email
//! lm-cli rekey admin-users
//!
//! # Fold the legacy registries into the consolidated registry
//! lm-cli consolidate
//! ```
//!
//! These are one-shot human-invoked utilities, not part of the running
//! request path.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lm-cli")]
#[command(author, version, about = "LoanMitra CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run document-store schema migrations
    Migrate,
    /// Seed registry data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Copy collections between two store instances
    Copy {
        /// Source database URL
        #[arg(long)]
        source: String,

        /// Destination database URL
        #[arg(long)]
        dest: String,

        /// Collections to copy (default: all known collections)
        #[arg(short, long)]
        collection: Vec<String>,
    },
    /// Re-key documents from one collection shape to another
    Rekey {
        #[command(subcommand)]
        target: RekeyTarget,
    },
    /// Fold the legacy registries into the consolidated registry
    Consolidate,
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Add a superuser email to both registries
    Superuser {
        /// Email address
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum RekeyTarget {
    /// Re-key admin_users documents to be keyed by email
    AdminUsers,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Superuser { email } => commands::seed::superuser(&email).await?,
        },
        Commands::Copy {
            source,
            dest,
            collection,
        } => commands::copy::run(&source, &dest, &collection).await?,
        Commands::Rekey { target } => match target {
            RekeyTarget::AdminUsers => commands::rekey::admin_users().await?,
        },
        Commands::Consolidate => commands::consolidate::run().await?,
    }
    Ok(())
}
