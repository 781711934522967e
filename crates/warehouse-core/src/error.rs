//! # Error Types
//!
//! Domain-specific error types for warehouse-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  warehouse-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input schema failures                          │
//! │                                                                         │
//! │  warehouse-db errors (separate crate)                                  │
//! │  └── DbError          - Store operation failures                       │
//! │                                                                         │
//! │  warehouse-api errors                                                  │
//! │  ├── AuthError        - Credential missing / rejected                  │
//! │  ├── ServiceError     - CoreError | DbError from InventoryService      │
//! │  └── ApiError         - What HTTP clients see (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → ApiError → client  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::stock::StockLevel;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. The API layer maps each
/// variant onto an HTTP status.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    ///
    /// ## When This Occurs
    /// - Selling a unit of a product id that doesn't exist
    /// - Product was deleted between the client's read and its sale
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No stock left to sell.
    ///
    /// ## When This Occurs
    /// - `quantity` is already zero when a sale arrives
    ///
    /// ## User Workflow
    /// ```text
    /// PATCH /product/:id  (sell one unit)
    ///      │
    ///      ▼
    /// Check stock: quantity=0
    ///      │
    ///      ▼
    /// InsufficientStock { id, available: 0 }
    ///      │
    ///      ▼
    /// Client shows: "Out of stock"
    /// ```
    #[error("Insufficient stock for {id}: available {available}")]
    InsufficientStock { id: String, available: i64 },

    /// The client's last-known counters no longer match the stored ones.
    ///
    /// ## When This Occurs
    /// - Two clients sell from the same stale snapshot; the second loses
    /// - A restock landed between the client's read and its sale
    #[error(
        "Stale counters for {id}: expected quantity {} / sold {}, found quantity {} / sold {}",
        .expected.quantity, .expected.sold, .actual.quantity, .actual.sold
    )]
    StaleCounters {
        id: String,
        expected: StockLevel,
        actual: StockLevel,
    },

    /// Selling one more unit would push a counter past what the store can
    /// hold. Only reachable for records written outside the API.
    #[error("Stock counters of {id} are at their limit")]
    CounterOverflow { id: String },

    /// The caller asked for another owner's products.
    #[error("Owner mismatch: {caller} may not list products of {requested}")]
    OwnerMismatch { requested: String, caller: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a request body doesn't meet its schema.
/// Raised before any store call is made.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Numeric value is above its ceiling.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: i64 },

    /// Invalid format (e.g., invalid UUID, invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The field is assigned by the server and can't be supplied.
    #[error("{field} is assigned by the server")]
    ReadOnly { field: String },

    /// Two fields must be supplied together or not at all.
    #[error("{first} and {second} must be supplied together")]
    Incomplete { first: String, second: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
