//! # Validation Module
//!
//! Input schema checks for every inventory operation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (Axum)                                        │
//! │  ├── JSON syntax and field types (deserialization)                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: InventoryService                                             │
//! │  └── THIS MODULE: required fields, numeric bounds, id/email format     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: ProductStore                                                 │
//! │  └── No checks; merges whatever it is given                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use warehouse_core::validation::{validate_email, validate_stock_count};
//!
//! validate_email("a@x.com").unwrap();
//! validate_stock_count("newQuantity", 50).unwrap();
//! assert!(validate_stock_count("newQuantity", -1).is_err());
//! ```

use crate::error::ValidationError;
use crate::stock::StockLevel;
use crate::types::NewProduct;
use crate::{MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_STOCK_COUNT, RESERVED_PRODUCT_KEYS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates an owner email.
///
/// ## Rules
/// - Must not be empty
/// - At most 254 characters
/// - Exactly one `@` with a non-empty local part and a dotted-or-bare domain
/// - No whitespace
///
/// ## Example
/// ```rust
/// use warehouse_core::validation::validate_email;
///
/// assert!(validate_email("a@x.com").is_ok());
/// assert!(validate_email("not-an-email").is_err());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if email.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            if domain.contains('@') {
                return Err(invalid("must contain exactly one '@'"));
            }
            if domain.starts_with('.') || domain.ends_with('.') {
                return Err(invalid("domain must not start or end with '.'"));
            }
            Ok(())
        }
        _ => Err(invalid("must look like local@domain")),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock counter (`quantity`, `sold`, `newQuantity`).
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Must not exceed [`MAX_STOCK_COUNT`]
pub fn validate_stock_count(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    if value > MAX_STOCK_COUNT {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: MAX_STOCK_COUNT,
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be a finite number
/// - Must be non-negative (zero allowed for free items)
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if price < 0.0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates the optional expected counters sent with a sale.
///
/// ## Rules
/// - `quantity` and `sold` come together or not at all
/// - Each must be non-negative
///
/// ## Returns
/// The expected pre-state, if the client supplied one.
pub fn validate_expected_counters(
    quantity: Option<i64>,
    sold: Option<i64>,
) -> ValidationResult<Option<StockLevel>> {
    match (quantity, sold) {
        (None, None) => Ok(None),
        (Some(quantity), Some(sold)) => {
            validate_stock_count("quantity", quantity)?;
            validate_stock_count("sold", sold)?;
            Ok(Some(StockLevel::new(quantity, sold)))
        }
        _ => Err(ValidationError::Incomplete {
            first: "quantity".to_string(),
            second: "sold".to_string(),
        }),
    }
}

// =============================================================================
// Document Validators
// =============================================================================

/// Validates creation input for a product.
///
/// ## Rules
/// - `name` required
/// - `price` finite and >= 0 when present
/// - `quantity`, `sold` in `0..=MAX_STOCK_COUNT`
/// - `email` well-formed when present
/// - No store-owned keys (`_id`, `id`, timestamps) among the extra attributes
pub fn validate_new_product(input: &NewProduct) -> ValidationResult<()> {
    match input.name.as_deref() {
        Some(name) => validate_product_name(name)?,
        None => {
            return Err(ValidationError::Required {
                field: "name".to_string(),
            })
        }
    }

    if let Some(price) = input.price {
        validate_price(price)?;
    }

    validate_stock_count("quantity", input.quantity)?;
    validate_stock_count("sold", input.sold)?;

    if let Some(email) = input.email.as_deref() {
        validate_email(email)?;
    }

    if let Some(key) = RESERVED_PRODUCT_KEYS
        .iter()
        .find(|key| input.attributes.contains_key(**key))
    {
        return Err(ValidationError::ReadOnly {
            field: key.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a product id.
///
/// ## Rules
/// - Must be a valid UUID string
///
/// ## Example
/// ```rust
/// use warehouse_core::validation::validate_product_id;
///
/// assert!(validate_product_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_product_id("not-a-uuid").is_err());
/// ```
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Bolt M8").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("ops+stock@warehouse.example").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("a.x.com").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("a@b@c").is_err());
        assert!(validate_email("a b@x.com").is_err());
        assert!(validate_email("a@.com").is_err());
        assert!(validate_email(&format!("{}@x.com", "a".repeat(260))).is_err());
    }

    #[test]
    fn test_validate_stock_count() {
        assert!(validate_stock_count("quantity", 0).is_ok());
        assert!(validate_stock_count("quantity", 50).is_ok());
        assert!(validate_stock_count("quantity", -1).is_err());

        assert!(validate_stock_count("sold", MAX_STOCK_COUNT).is_ok());
        assert!(matches!(
            validate_stock_count("sold", MAX_STOCK_COUNT + 1),
            Err(ValidationError::TooLarge { field, .. }) if field == "sold"
        ));
        assert!(validate_stock_count("sold", i64::MAX).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(10.99).is_ok());
        assert!(validate_price(-0.01).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_expected_counters() {
        assert_eq!(validate_expected_counters(None, None).unwrap(), None);
        assert_eq!(
            validate_expected_counters(Some(10), Some(0)).unwrap(),
            Some(StockLevel::new(10, 0))
        );

        assert!(matches!(
            validate_expected_counters(Some(10), None),
            Err(ValidationError::Incomplete { .. })
        ));
        assert!(matches!(
            validate_expected_counters(Some(-1), Some(0)),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_validate_new_product() {
        assert!(validate_new_product(&NewProduct::named("Bolt", 10)).is_ok());

        let missing_name = NewProduct::default();
        assert!(matches!(
            validate_new_product(&missing_name),
            Err(ValidationError::Required { .. })
        ));

        let mut negative = NewProduct::named("Bolt", -1);
        assert!(validate_new_product(&negative).is_err());
        negative.quantity = 1;
        negative.price = Some(-5.0);
        assert!(validate_new_product(&negative).is_err());

        let mut bad_owner = NewProduct::named("Bolt", 1);
        bad_owner.email = Some("nobody".into());
        assert!(validate_new_product(&bad_owner).is_err());
    }

    #[test]
    fn test_validate_new_product_rejects_client_id() {
        let input: NewProduct = serde_json::from_value(json!({
            "_id": "abc",
            "name": "Bolt"
        }))
        .unwrap();

        assert!(matches!(
            validate_new_product(&input),
            Err(ValidationError::ReadOnly { field }) if field == "_id"
        ));
    }

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_product_id("").is_err());
        assert!(validate_product_id("62763b1cfa0e9c1e9c3a1e4b").is_err());
    }
}
