//! # Store Errors
//!
//! [`DbError`] is what every [`ProductStore`](crate::ProductStore) call can
//! fail with. `sqlx` errors are sorted into it here; the service wraps it as
//! `ServiceError::Store` and the HTTP layer turns it into a generic 500
//! after logging the detail.
//!
//! ```text
//! sqlx::Error ──► DbError ──► ServiceError::Store ──► 500 DATABASE_ERROR
//! ```

use thiserror::Error;

/// Failure of a product store operation.
///
/// Clients only ever see a generic store failure. The variants are for logs
/// and for callers such as the seed tool.
#[derive(Debug, Error)]
pub enum DbError {
    /// An insert hit an existing key, e.g. a generated id collided.
    #[error("{field} '{value}' is already taken")]
    UniqueViolation { field: String, value: String },

    /// The store file can't be opened, or the pool was closed at shutdown.
    #[error("Store unavailable: {0}")]
    ConnectionFailed(String),

    #[error("Schema migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement.
    #[error("Statement failed: {0}")]
    QueryFailed(String),

    /// Begin or commit of a multi-statement update failed.
    #[error("Could not commit update: {0}")]
    TransactionFailed(String),

    /// A stored document couldn't be decoded.
    ///
    /// ## When This Occurs
    /// - The `attributes` column holds something other than a JSON object
    #[error("Corrupt record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },

    /// Every pooled connection stayed busy past the acquire timeout.
    #[error("No store connection available")]
    PoolExhausted,

    #[error("Store error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn corrupt(id: impl Into<String>, reason: impl ToString) -> Self {
        DbError::CorruptRecord {
            id: id.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => {
                let message = db.message();

                // "UNIQUE constraint failed: products.id"
                match message.strip_prefix("UNIQUE constraint failed: ") {
                    Some(column) => DbError::duplicate(column, "?"),
                    None => DbError::QueryFailed(message.to_string()),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(failure: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(failure.to_string())
    }
}

/// Result of a product store operation.
pub type DbResult<T> = Result<T, DbError>;
