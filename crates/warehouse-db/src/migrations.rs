//! # Schema Migrations
//!
//! The `products` schema ships inside the binary and is brought up to date
//! when the store opens.
//!
//! ```text
//! Database::new
//!     │
//!     ▼
//! MIGRATOR.run(pool)
//!     │  reads _sqlx_migrations (created on first run)
//!     │  skips versions already recorded, checksums the rest
//!     ▼
//! 001_products.sql ... NNN_*.sql applied in version order
//! ```
//!
//! Schema changes go in a new `migrations/sqlite/NNN_what_changed.sql`.
//! Files that have already shipped are never edited; sqlx refuses to start
//! when a recorded checksum no longer matches.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every embedded migration the store hasn't recorded yet.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let embedded = MIGRATOR.migrations.len();
    info!(embedded, "Applying product store migrations");

    MIGRATOR.run(pool).await?;

    info!("Product store schema is current");
    Ok(())
}

/// `(embedded, applied)` counts. Equal means the schema is current.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
        .fetch_one(pool)
        .await?;

    Ok((embedded, usize::try_from(applied).unwrap_or(0)))
}
