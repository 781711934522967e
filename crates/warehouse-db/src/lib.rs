//! # warehouse-db: Product Store for the Warehouse Inventory
//!
//! This crate provides persistence for the inventory API. It defines the
//! [`ProductStore`] contract the service layer talks to and implements it on
//! SQLite with sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Warehouse Inventory Data Flow                       │
//! │                                                                         │
//! │  InventoryService (sell_unit, restock, list_owned, ...)                │
//! │       │                                                                 │
//! │       │  Arc<dyn ProductStore>                                          │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   warehouse-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (product.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │ 001_products │  │   │
//! │  │   │ init/close    │    │ impl Store    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`store`] - The `ProductStore` trait and its acknowledgement types
//! - [`repository`] - SQLite implementation of the store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warehouse_db::{Database, DbConfig, ProductFilter, ProductStore};
//!
//! let db = Database::new(DbConfig::new("./warehouse.db")).await?;
//! let store = db.products();
//!
//! let owned = store.find_all(&ProductFilter::owned_by("a@x.com")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::product::ProductRepository;
pub use store::{DeleteAck, InsertAck, ProductFilter, ProductPatch, ProductStore, UpdateAck};
