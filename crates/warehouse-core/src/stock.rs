//! # Stock Counters
//!
//! The two inventory counters of a product and the rules that move them.
//!
//! ## State Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Product Stock Lifecycle                             │
//! │                                                                         │
//! │   Created(quantity = q0, sold = 0)                                     │
//! │        │                                                                │
//! │        ├── Sell ────► quantity - 1, sold + 1   (only while quantity > 0)│
//! │        │                                                                │
//! │        └── Restock ─► quantity = n             (absolute, n >= 0)      │
//! │                                                                         │
//! │   Terminal state: deletion only                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store applies a sale atomically against the persisted counters. When
//! its guard rejects the write, [`classify_rejected_sale`] turns the
//! re-read state into the error the caller sees.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// The `quantity` / `sold` pair of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    /// Units currently in stock.
    pub quantity: i64,
    /// Cumulative units sold.
    pub sold: i64,
}

impl StockLevel {
    /// Creates a stock level.
    #[inline]
    pub const fn new(quantity: i64, sold: i64) -> Self {
        StockLevel { quantity, sold }
    }

    /// Returns true if at least one unit can be sold.
    #[inline]
    pub const fn can_sell(&self) -> bool {
        self.quantity > 0
    }

    /// Computes the counters after selling one unit.
    ///
    /// ## Rules
    /// - `quantity` must be positive; the sale is rejected, never clamped
    /// - `quantity - 1`, `sold + 1`, neither allowed to overflow
    pub fn after_sale(&self, id: &str) -> CoreResult<StockLevel> {
        if !self.can_sell() {
            return Err(CoreError::InsufficientStock {
                id: id.to_string(),
                available: self.quantity,
            });
        }

        match (self.quantity.checked_sub(1), self.sold.checked_add(1)) {
            (Some(quantity), Some(sold)) => Ok(StockLevel { quantity, sold }),
            _ => Err(CoreError::CounterOverflow { id: id.to_string() }),
        }
    }
}

/// Explains why the store's guarded sale matched no row.
///
/// ## Decision Order
/// ```text
/// current is None                  → ProductNotFound
/// current.quantity <= 0            → InsufficientStock
/// current.sold at i64::MAX         → CounterOverflow
/// expected given and != current    → StaleCounters
/// otherwise (raced and recovered)  → StaleCounters against current
/// ```
pub fn classify_rejected_sale(
    id: &str,
    expected: Option<StockLevel>,
    current: Option<StockLevel>,
) -> CoreError {
    let Some(current) = current else {
        return CoreError::ProductNotFound(id.to_string());
    };

    if let Err(err) = current.after_sale(id) {
        return err;
    }

    CoreError::StaleCounters {
        id: id.to_string(),
        expected: expected.unwrap_or(current),
        actual: current,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
