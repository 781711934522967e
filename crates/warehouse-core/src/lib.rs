//! # warehouse-core: Pure Business Logic for the Warehouse Inventory
//!
//! This crate is the **heart** of the warehouse inventory API. It holds the
//! domain types, the stock transition rules, and the input schema checks as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Warehouse Inventory Architecture                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP clients (browser, scripts)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             warehouse-api (Axum, AuthGuard, Inventory)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ warehouse-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   stock   │  │ validation│                  │   │
//! │  │   │  Product  │  │ StockLevel│  │   rules   │                  │   │
//! │  │   │  Identity │  │ after_sale│  │   checks  │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              warehouse-db (ProductStore over SQLite)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, NewProduct, Identity)
//! - [`stock`] - Stock counters and the sale transition
//! - [`error`] - Domain error types
//! - [`validation`] - Input schema validation
//!
//! ## Example Usage
//!
//! ```rust
//! use warehouse_core::stock::StockLevel;
//!
//! let level = StockLevel::new(10, 0);
//! let next = level.after_sale("bolt-1").unwrap();
//!
//! assert_eq!(next, StockLevel::new(9, 1));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use stock::StockLevel;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of an owner email (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Largest value a client may set for `quantity`, `sold`, or `newQuantity`.
/// Keeps sales far away from the 64-bit integer limit of the store.
pub const MAX_STOCK_COUNT: i64 = 1_000_000_000_000;

/// Document keys the store owns. Clients may not set them on create.
pub const RESERVED_PRODUCT_KEYS: &[&str] = &["_id", "id", "createdAt", "updatedAt"];
