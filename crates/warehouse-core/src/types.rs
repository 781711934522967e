//! # Domain Types
//!
//! Core domain types used throughout the warehouse inventory.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   NewProduct    │   │    Identity     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  _id (UUID)     │   │  name           │   │  email          │       │
//! │  │  name, price    │   │  price          │   │  (decoded from  │       │
//! │  │  quantity, sold │   │  quantity, sold │   │   the token)    │       │
//! │  │  email (owner)  │   │  + attributes   │   │                 │       │
//! │  │  + attributes   │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Document Semantics
//! Products are stored as documents: the well-known fields are typed, and
//! every other caller-supplied key is kept verbatim in `attributes`, which
//! is flattened back into the JSON on the way out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::stock::StockLevel;

// =============================================================================
// Product
// =============================================================================

/// A product record in the warehouse.
///
/// ## Wire Shape
/// ```json
/// {
///   "_id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
///   "name": "Bolt",
///   "price": 0.25,
///   "quantity": 9,
///   "sold": 1,
///   "email": "a@x.com",
///   "createdAt": "2026-01-01T00:00:00Z",
///   "updatedAt": "2026-01-01T00:00:00Z",
///   "color": "silver"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identifier (UUID v4). Never changes.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Supplier name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Unit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// Units currently in stock.
    #[serde(default)]
    pub quantity: i64,

    /// Cumulative units sold.
    #[serde(default)]
    pub sold: i64,

    /// Owner email; absent until assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last written.
    pub updated_at: DateTime<Utc>,

    /// Any other caller-supplied keys.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    /// Builds a full record from creation input and a store-generated id.
    pub fn from_new(id: String, input: NewProduct, now: DateTime<Utc>) -> Self {
        Product {
            id,
            name: input.name,
            category: input.category,
            description: input.description,
            supplier: input.supplier,
            image: input.image,
            price: input.price,
            quantity: input.quantity,
            sold: input.sold,
            email: input.email,
            created_at: now,
            updated_at: now,
            attributes: input.attributes,
        }
    }

    /// Returns the current stock counters.
    #[inline]
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::new(self.quantity, self.sold)
    }

    /// Checks whether the product is assigned to the given owner.
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.email.as_deref() == Some(email)
    }
}

// =============================================================================
// New Product
// =============================================================================

/// Creation input for a product (`POST /myItems`).
///
/// Counters default to zero. Unknown keys land in `attributes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default)]
    pub quantity: i64,

    #[serde(default)]
    pub sold: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl NewProduct {
    /// Creates input with a name and opening stock.
    pub fn named(name: impl Into<String>, quantity: i64) -> Self {
        NewProduct {
            name: Some(name.into()),
            quantity,
            ..Default::default()
        }
    }
}

// =============================================================================
// Identity
// =============================================================================

/// The verified caller, as decoded from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
}

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Identity {
            email: email.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
