pub mod kv;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::runtime::Runtime;

use crate::storage::KeyValueStore;

/// Get the path to the database file using platform-specific data directory
pub fn get_db_path() -> Result<PathBuf> {
    let mut path = dirs::data_dir()
        .context("Unable to determine data directory for your platform")?;

    path.push("guess-the-movie");

    // Create directory if it doesn't exist
    std::fs::create_dir_all(&path)
        .context("Failed to create guess-the-movie data directory")?;

    path.push("history.db");
    Ok(path)
}

/// Create a connection pool to the SQLite database at `db_path`
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

/// Key/value store persisted in SQLite.
///
/// Owns a single-threaded runtime so the synchronous game loop can drive the
/// async pool. Must not be used from inside another tokio runtime.
pub struct SqliteStore {
    runtime: Runtime,
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start database runtime")?;
        let pool = runtime.block_on(create_pool(db_path))?;
        tracing::info!("Opened history database at {}", db_path.display());
        Ok(Self { runtime, pool })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.runtime.block_on(kv::get_value(&self.pool, key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.runtime.block_on(kv::set_value(&self.pool, key, value))
    }
}
