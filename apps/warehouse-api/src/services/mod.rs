//! Service layer.
//!
//! Business logic sits here, between the axum handlers and the store.

pub mod inventory_service;

pub use inventory_service::{InventoryService, ServiceError, ServiceResult};
