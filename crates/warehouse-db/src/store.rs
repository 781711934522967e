//! # Product Store Contract
//!
//! The narrow interface the inventory service uses to reach persistence.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ProductStore                                     │
//! │                                                                         │
//! │  find_all(filter)             → Vec<Product>   (insertion order)       │
//! │  find_by_id(id)               → Option<Product>                        │
//! │  insert(new_product)          → InsertAck      (id generated here)     │
//! │  delete_by_id(id)             → DeleteAck      (0 rows is not an error)│
//! │  update_fields(id, patch, up) → UpdateAck      (merge, optional upsert)│
//! │  apply_sale(id, expected)     → Option<StockLevel>  (atomic, guarded)  │
//! │  count()                      → i64                                    │
//! │                                                                         │
//! │  The store validates nothing. Bounds and formats are checked by the    │
//! │  service before a call gets here.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Acknowledgements
//! Writes answer with the same acknowledgement documents a document store
//! returns, so clients can tell "nothing matched" from "changed".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use warehouse_core::{NewProduct, Product, StockLevel};

use crate::error::DbResult;

// =============================================================================
// Filter & Patch
// =============================================================================

/// Equality constraints for [`ProductStore::find_all`].
///
/// An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Match products assigned to this owner.
    pub email: Option<String>,
}

impl ProductFilter {
    /// Matches every product.
    pub fn all() -> Self {
        ProductFilter::default()
    }

    /// Matches products assigned to `email`.
    pub fn owned_by(email: impl Into<String>) -> Self {
        ProductFilter {
            email: Some(email.into()),
        }
    }
}

/// Named fields to merge into a record. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub quantity: Option<i64>,
    pub sold: Option<i64>,
    pub email: Option<String>,
}

impl ProductPatch {
    /// Sets the stock quantity.
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the cumulative sold counter.
    pub fn sold(mut self, sold: i64) -> Self {
        self.sold = Some(sold);
        self
    }

    /// Sets the owner email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Returns true if the patch names no field.
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none() && self.sold.is_none() && self.email.is_none()
    }
}

// =============================================================================
// Acknowledgements
// =============================================================================

/// Result of [`ProductStore::insert`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertAck {
    pub fn new(inserted_id: impl Into<String>) -> Self {
        InsertAck {
            acknowledged: true,
            inserted_id: inserted_id.into(),
        }
    }
}

/// Result of [`ProductStore::delete_by_id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteAck {
    pub fn new(deleted_count: u64) -> Self {
        DeleteAck {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Result of [`ProductStore::update_fields`] and of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

impl UpdateAck {
    /// One existing record matched and was rewritten.
    pub fn modified() -> Self {
        UpdateAck {
            acknowledged: true,
            matched_count: 1,
            modified_count: 1,
            upserted_count: 0,
            upserted_id: None,
        }
    }

    /// One record matched but already held the patched values, so nothing
    /// was written.
    pub fn unchanged() -> Self {
        UpdateAck {
            acknowledged: true,
            matched_count: 1,
            modified_count: 0,
            upserted_count: 0,
            upserted_id: None,
        }
    }

    /// Nothing matched and nothing was created.
    pub fn unmatched() -> Self {
        UpdateAck {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 0,
            upserted_id: None,
        }
    }

    /// Nothing matched, so a minimal record was created under `id`.
    pub fn upserted(id: impl Into<String>) -> Self {
        UpdateAck {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(id.into()),
        }
    }
}

// =============================================================================
// Store Trait
// =============================================================================

/// Persistent collection of product documents.
///
/// Implementations are shared across requests behind an `Arc`, so every
/// method takes `&self`.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Returns every product matching `filter`, in insertion order.
    async fn find_all(&self, filter: &ProductFilter) -> DbResult<Vec<Product>>;

    /// Returns the product with `id`, if any.
    async fn find_by_id(&self, id: &str) -> DbResult<Option<Product>>;

    /// Persists a new product under a freshly generated id.
    async fn insert(&self, product: NewProduct) -> DbResult<InsertAck>;

    /// Deletes zero or one product.
    async fn delete_by_id(&self, id: &str) -> DbResult<DeleteAck>;

    /// Merges `patch` into the product with `id`.
    ///
    /// A product whose fields already equal the patch is left untouched and
    /// reported as matched but not modified. When no product matches and
    /// `upsert` is set, creates a minimal record holding only the patched
    /// fields (counters default to zero).
    async fn update_fields(&self, id: &str, patch: ProductPatch, upsert: bool)
        -> DbResult<UpdateAck>;

    /// Sells one unit in a single atomic write.
    ///
    /// The write only applies while `quantity > 0` and, when `expected` is
    /// given, while the stored counters equal it. A `sold` already at
    /// `i64::MAX` is never incremented. Returns the new counters, or `None`
    /// if the guard matched no row.
    async fn apply_sale(&self, id: &str, expected: Option<StockLevel>)
        -> DbResult<Option<StockLevel>>;

    /// Counts all products.
    async fn count(&self) -> DbResult<i64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patch_builder() {
        let patch = ProductPatch::default().quantity(50);
        assert_eq!(patch.quantity, Some(50));
        assert!(patch.sold.is_none());
        assert!(!patch.is_empty());
        assert!(ProductPatch::default().is_empty());
    }

    #[test]
    fn test_ack_wire_shape() {
        let ack = serde_json::to_value(UpdateAck::upserted("abc")).unwrap();
        assert_eq!(
            ack,
            json!({
                "acknowledged": true,
                "matchedCount": 0,
                "modifiedCount": 0,
                "upsertedCount": 1,
                "upsertedId": "abc"
            })
        );

        let ack = serde_json::to_value(DeleteAck::new(0)).unwrap();
        assert_eq!(ack, json!({ "acknowledged": true, "deletedCount": 0 }));

        let ack = serde_json::to_value(InsertAck::new("abc")).unwrap();
        assert_eq!(ack, json!({ "acknowledged": true, "insertedId": "abc" }));
    }
}
