//! HTTP handlers.
//!
//! Each handler extracts its inputs, makes exactly one call into
//! [`InventoryService`](crate::services::InventoryService) or the token
//! manager, and serializes the result. No business rules live here.

pub mod health;
pub mod my_items;
pub mod products;
pub mod token;
