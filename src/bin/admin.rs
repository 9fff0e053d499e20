//! CLI administration tool for expiring-shortener.
//!
//! Works directly on the database file, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Purge expired mappings now (one reaper cycle)
//! cargo run --bin admin -- purge
//!
//! # Show a mapping by identifier or short URL
//! cargo run --bin admin -- lookup https://s.example.com/aZ3kP9
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (optional): SQLite URL, default `sqlite:./db.sqlite`

use expiring_shortener::domain::reaper::run_purge_cycle;
use expiring_shortener::domain::repositories::MappingStore;
use expiring_shortener::infrastructure::persistence::{self, MIGRATOR, SqliteMappingStore};
use expiring_shortener::utils::clock::{Clock, SystemClock};
use expiring_shortener::utils::short_id::extract_short_id;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing expiring-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./db.sqlite")]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Delete every expired mapping now
    Purge {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show the mapping behind a short identifier or short URL
    Lookup {
        /// Identifier (`aZ3kP9`) or full short URL
        id_or_url: String,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let pool = persistence::connect(&cli.database_url, 1)
        .await
        .with_context(|| format!("Failed to open database {}", cli.database_url))?;

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let store = SqliteMappingStore::new(Arc::new(pool));
    let clock = SystemClock;

    match cli.command {
        Commands::Purge { yes } => purge(&store, &clock, yes).await?,
        Commands::Lookup { id_or_url } => lookup(&store, &clock, &id_or_url).await?,
        Commands::Stats => handle_stats(&store, &clock).await?,
        Commands::Db { action } => handle_db_action(action, &store).await?,
    }

    Ok(())
}

/// Runs one reaper cycle after confirmation.
async fn purge(store: &SqliteMappingStore, clock: &dyn Clock, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Purge expired mappings".bright_blue().bold());
    println!();

    let pending = store
        .count_expired(clock.now())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count expired mappings: {}", e))?;

    if pending == 0 {
        println!("{}", "  Nothing to purge".yellow());
        return Ok(());
    }

    println!(
        "  Expired mappings: {}",
        pending.to_string().bright_yellow().bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete them now?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = run_purge_cycle(store, clock)
        .await
        .map_err(|e| anyhow::anyhow!("Purge failed: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Removed".green().bold(),
        format!("{removed} mappings").bright_white().bold()
    );
    println!();

    Ok(())
}

/// Prints one mapping and whether it has expired.
///
/// # Output Format
///
/// ```text
///   Short id:  aZ3kP9
///   Long URL:  https://example.com/a
///   Expires:   2024-01-15 10:30:00 UTC (expired)
/// ```
async fn lookup(store: &SqliteMappingStore, clock: &dyn Clock, id_or_url: &str) -> Result<()> {
    let short_id = extract_short_id(id_or_url).context("No short id in input")?;

    let mapping = store
        .find_by_short_id(short_id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let Some(mapping) = mapping else {
        println!("{} {}", "⚠️  No mapping for".yellow(), short_id.cyan());
        return Ok(());
    };

    let expires = mapping
        .expires_at_utc()
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| mapping.expires_at.to_string());

    let status = if mapping.is_expired_at(clock.now()) {
        "expired".red()
    } else {
        "live".green()
    };

    println!("  Short id:  {}", mapping.short_id.cyan());
    println!("  Long URL:  {}", mapping.long_url.bright_white());
    println!("  Expires:   {} ({})", expires.bright_black(), status);
    println!();

    Ok(())
}

/// Displays mapping counts.
async fn handle_stats(store: &SqliteMappingStore, clock: &dyn Clock) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let total = store
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let expired = store
        .count_expired(clock.now())
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "  Mappings:         {}",
        total.to_string().bright_green().bold()
    );
    println!(
        "  Awaiting purge:   {}",
        expired.to_string().bright_yellow().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, store: &SqliteMappingStore) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(store.pool()).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
    }

    Ok(())
}
