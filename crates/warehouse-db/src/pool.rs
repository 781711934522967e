//! # Store Pool
//!
//! Opens, migrates, and shuts down the SQLite pool behind the product store.
//!
//! ## Lifecycle
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  main                                                                 │
//! │    ApiConfig::db_config()          pool size, file or :memory:        │
//! │         │                                                             │
//! │         ▼                                                             │
//! │    Database::new(cfg).await        open pool, apply migrations        │
//! │         │                          (an error here stops the server)   │
//! │         ▼                                                             │
//! │    db.products()                   Arc<dyn ProductStore> for service  │
//! │         │                                                             │
//! │         ▼  requests share pooled connections                          │
//! │    db.close().await                after graceful shutdown            │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! File stores use the write-ahead log so product reads keep flowing while a
//! sale commits. The in-memory store keeps SQLite's default journal.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::product::ProductRepository;

/// Path value that selects a private in-memory database.
const IN_MEMORY_PATH: &str = ":memory:";

const ACQUIRE_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Pool settings
// =============================================================================

/// Where the product store lives and how its pool is sized.
///
/// ```rust
/// use warehouse_db::DbConfig;
///
/// let cfg = DbConfig::new("./warehouse.db").max_connections(8);
/// assert_eq!(cfg.max_connections, 8);
/// assert!(!cfg.is_in_memory());
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Upper bound on open connections (default 5).
    pub max_connections: u32,

    /// Connections kept open while idle (default 1).
    pub min_connections: u32,

    /// How long a request waits for a free connection (default 30s).
    pub connect_timeout: Duration,

    /// Idle connections above the floor are closed after this (default 10m).
    pub idle_timeout: Option<Duration>,

    /// Apply pending migrations in [`Database::new`] (default on).
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed store at `path`, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(ACQUIRE_TIMEOUT_SECS),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, limit: u32) -> Self {
        self.max_connections = limit;
        self
    }

    pub fn min_connections(mut self, floor: u32) -> Self {
        self.min_connections = floor;
        self
    }

    pub fn connect_timeout(mut self, wait: Duration) -> Self {
        self.connect_timeout = wait;
        self
    }

    /// Skip migrations when the schema is managed elsewhere.
    pub fn run_migrations(mut self, enabled: bool) -> Self {
        self.run_migrations = enabled;
        self
    }

    /// Throwaway store for tests and `:memory:` deployments.
    ///
    /// The data lives inside one SQLite connection, so the pool holds exactly
    /// one and never recycles it.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    /// Whether this points at the throwaway in-memory store.
    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(IN_MEMORY_PATH)
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            return SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()));
        }

        Ok(SqliteConnectOptions::new()
            .filename(&self.database_path)
            .journal_mode(SqliteJournalMode::Wal)
            // a power cut may drop the last committed sale, never corrupts
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true))
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Owned handle to the store's connection pool.
///
/// Created once at startup and closed explicitly on shutdown. Request
/// handlers never see it directly; they reach the data through the
/// [`ProductStore`](crate::ProductStore) returned by [`Database::products`].
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool described by `cfg` and, unless disabled, brings the
    /// schema up to date.
    pub async fn new(cfg: DbConfig) -> DbResult<Self> {
        info!(path = %cfg.database_path.display(), "Opening product store");

        let options = cfg.connect_options()?;
        debug!(in_memory = cfg.is_in_memory(), "Store connect options ready");

        let mut builder = SqlitePoolOptions::new()
            .max_connections(cfg.max_connections)
            .min_connections(cfg.min_connections)
            .acquire_timeout(cfg.connect_timeout)
            .idle_timeout(cfg.idle_timeout);

        if cfg.is_in_memory() {
            // Recycling the only connection would drop the whole database.
            builder = builder.max_lifetime(None::<Duration>);
        }

        let pool = builder
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        info!(connections = cfg.max_connections, "Product store pool open");

        let store = Database { pool };
        if cfg.run_migrations {
            store.run_migrations().await?;
        }

        Ok(store)
    }

    /// Applies any embedded migration not yet recorded.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// `(embedded, applied)` migration counts, for the readiness probe.
    pub async fn migration_status(&self) -> DbResult<(usize, usize)> {
        migrations::migration_status(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// SQLite implementation of [`ProductStore`](crate::ProductStore).
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    /// Waits for borrowed connections to come back, then closes the pool.
    /// Store calls made afterwards fail with [`DbError::ConnectionFailed`].
    pub async fn close(&self) {
        info!("Closing product store");
        self.pool.close().await;
    }

    /// True when a trivial query round-trips.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store_is_migrated() {
        let store = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(store.health_check().await);

        let (embedded, applied) = store.migration_status().await.unwrap();
        assert!(embedded >= 1);
        assert_eq!(embedded, applied);
    }

    #[tokio::test]
    async fn test_close_fails_health_check() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
    }

    #[test]
    fn test_pool_settings() {
        let cfg = DbConfig::new("/var/lib/warehouse/stock.db")
            .max_connections(12)
            .min_connections(3)
            .run_migrations(false);

        assert_eq!((cfg.max_connections, cfg.min_connections), (12, 3));
        assert!(!cfg.run_migrations);
        assert!(!cfg.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }
}
