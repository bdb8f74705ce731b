//! Podshelf Storage
//!
//! Multi-user `SQLite` database layer for Podshelf.
//!
//! This crate persists podcasts, episodes, subscriptions, play queues,
//! playlists, and listening progress.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each feature owns its own queries and logic
//! - **Dense Ordering**: Queue and playlist positions are kept at `0..N-1` by
//!   one transaction per mutation (see [`podshelf_core::ordering`])
//! - **Multi-User**: Every per-user query is scoped by user ID
//!
//! # Example
//!
//! ```rust,no_run
//! use podshelf_storage::{LocalStorageContext, create_pool, run_migrations};
//! use podshelf_core::{ProgressPolicy, StorageContext, UserId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://podshelf.db").await?;
//! run_migrations(&pool).await?;
//!
//! let storage = LocalStorageContext::new(pool, UserId::new("user-1"), ProgressPolicy::default());
//! let queue = storage.get_queue().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod positions;
mod time;

// Vertical slices
pub mod playlists;
pub mod podcasts;
pub mod progress;
pub mod queue;
pub mod subscriptions;
pub mod users;

pub use context::LocalStorageContext;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{Sqlite, SqlitePool};
use sqlx::Transaction;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Begin a transaction that takes the write lock up front
///
/// Concurrent writers queue on the pool's busy timeout instead of failing
/// with `SQLITE_BUSY` when a deferred read upgrades to a write.
pub(crate) async fn begin_write(
    pool: &SqlitePool,
) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://podshelf.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("SQLite pool created");

    Ok(pool)
}
