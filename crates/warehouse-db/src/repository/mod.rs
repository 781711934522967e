//! # Repository Module
//!
//! SQLite implementations of the store contracts.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where the SQL Lives                                  │
//! │                                                                         │
//! │  InventoryService                                                      │
//! │       │                                                                 │
//! │       │  store.apply_sale(id, expected)                                │
//! │       ▼                                                                 │
//! │  dyn ProductStore  (store.rs)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductRepository (this module)                                       │
//! │  ├── find_all / find_by_id                                             │
//! │  ├── insert / delete_by_id                                             │
//! │  ├── update_fields (merge + upsert, one transaction)                   │
//! │  └── apply_sale    (single guarded UPDATE ... RETURNING)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product documents and stock counters

pub mod product;
