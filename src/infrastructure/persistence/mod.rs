//! SQLite persistence.
//!
//! - [`SqliteMappingStore`] - Mapping storage, lookup and purge
//! - [`connect`] - Pool construction for the single database file
//! - [`MIGRATOR`] - Embedded schema migrations from `./migrations`

pub mod sqlite_mapping_store;

pub use sqlite_mapping_store::SqliteMappingStore;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

/// Schema migrations embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Opens (creating if missing) the SQLite database at `database_url`.
///
/// Uses WAL journaling with `synchronous = FULL` so a committed write
/// survives a crash.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the file cannot be opened.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Full)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await
}
