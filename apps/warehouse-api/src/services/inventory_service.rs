//! Inventory service.
//!
//! Owns every business rule of the API: input schemas, the sale decision,
//! and the owner check of owner-scoped listings. Handlers call exactly one
//! method here per request.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sell_unit(id, expected?)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.apply_sale(id, expected)     one guarded UPDATE                 │
//! │       │                                                                 │
//! │       ├── Some(new counters) ─────► UpdateAck { modifiedCount: 1 }     │
//! │       │                                                                 │
//! │       └── None ──► store.find_by_id(id)                                │
//! │                         │                                               │
//! │                         ├── missing ──────► ProductNotFound  (404)     │
//! │                         ├── quantity <= 0 ► InsufficientStock (409)    │
//! │                         ├── sold saturated ► CounterOverflow  (409)    │
//! │                         └── otherwise ────► StaleCounters     (409)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use warehouse_core::stock::classify_rejected_sale;
use warehouse_core::validation::{
    validate_email, validate_new_product, validate_product_id, validate_stock_count,
};
use warehouse_core::{CoreError, Identity, NewProduct, Product, StockLevel, ValidationError};
use warehouse_db::{
    DbError, DeleteAck, InsertAck, ProductFilter, ProductPatch, ProductStore, UpdateAck,
};

/// Errors raised by [`InventoryService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A business rule or input schema was violated.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] DbError),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(CoreError::Validation(err))
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Business core of the inventory API.
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn ProductStore>,
}

impl InventoryService {
    /// Create a new inventory service over a store.
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        InventoryService { store }
    }

    /// Validate and persist a new product.
    pub async fn create_product(&self, input: NewProduct) -> ServiceResult<InsertAck> {
        validate_new_product(&input)?;

        let ack = self.store.insert(input).await?;
        info!(id = %ack.inserted_id, "Product created");
        Ok(ack)
    }

    /// All products in insertion order.
    pub async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.store.find_all(&ProductFilter::all()).await?)
    }

    /// One product, or `None` if the id is unknown.
    pub async fn get_product(&self, id: &str) -> ServiceResult<Option<Product>> {
        validate_product_id(id)?;
        Ok(self.store.find_by_id(id).await?)
    }

    /// Hard-delete a product. Deleting an unknown id is not an error.
    pub async fn delete_product(&self, id: &str) -> ServiceResult<DeleteAck> {
        validate_product_id(id)?;

        let ack = self.store.delete_by_id(id).await?;
        info!(id = %id, deleted = ack.deleted_count, "Product deleted");
        Ok(ack)
    }

    /// Sell one unit.
    ///
    /// New counters are always computed by the store from what it holds.
    /// `expected`, when given, only has to match the stored counters for the
    /// sale to go through.
    pub async fn sell_unit(
        &self,
        id: &str,
        expected: Option<StockLevel>,
    ) -> ServiceResult<UpdateAck> {
        validate_product_id(id)?;
        if let Some(level) = expected {
            validate_stock_count("quantity", level.quantity)?;
            validate_stock_count("sold", level.sold)?;
        }

        if let Some(level) = self.store.apply_sale(id, expected).await? {
            info!(id = %id, quantity = level.quantity, sold = level.sold, "Unit sold");
            return Ok(UpdateAck::modified());
        }

        let current = self
            .store
            .find_by_id(id)
            .await?
            .map(|product| product.stock_level());

        let err = classify_rejected_sale(id, expected, current);
        warn!(id = %id, error = %err, "Sale rejected");
        Err(err.into())
    }

    /// Set the stock quantity to an absolute value.
    ///
    /// An unknown id creates a minimal record holding only the quantity.
    pub async fn restock(&self, id: &str, new_quantity: i64) -> ServiceResult<UpdateAck> {
        validate_product_id(id)?;
        validate_stock_count("newQuantity", new_quantity)?;

        let ack = self
            .store
            .update_fields(id, ProductPatch::default().quantity(new_quantity), true)
            .await?;

        info!(
            id = %id,
            quantity = new_quantity,
            upserted = ack.upserted_count,
            "Product restocked"
        );
        Ok(ack)
    }

    /// Assign a product to an owner. An unknown id creates a minimal record.
    pub async fn assign_owner(&self, id: &str, email: &str) -> ServiceResult<UpdateAck> {
        validate_product_id(id)?;
        validate_email(email)?;

        let ack = self
            .store
            .update_fields(id, ProductPatch::default().email(email), true)
            .await?;

        info!(id = %id, owner = %email, upserted = ack.upserted_count, "Owner assigned");
        Ok(ack)
    }

    /// Products owned by `requested`, visible only to that same owner.
    ///
    /// Anything other than the caller's own email, including no email at
    /// all, is an owner mismatch. The identity was validated when its token
    /// was issued, so `requested` needs no format check of its own.
    pub async fn list_owned(
        &self,
        requested: Option<&str>,
        identity: &Identity,
    ) -> ServiceResult<Vec<Product>> {
        match requested {
            Some(email) if email == identity.email => Ok(self
                .store
                .find_all(&ProductFilter::owned_by(email))
                .await?),
            _ => {
                let requested = requested.unwrap_or_default();
                warn!(requested = %requested, caller = %identity.email, "Owner mismatch");
                Err(CoreError::OwnerMismatch {
                    requested: requested.to_string(),
                    caller: identity.email.clone(),
                }
                .into())
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;
    use warehouse_db::{Database, DbConfig};

    async fn service() -> (InventoryService, Database) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = InventoryService::new(Arc::new(db.products()));
        (service, db)
    }

    async fn create(service: &InventoryService, name: &str, quantity: i64) -> String {
        service
            .create_product(NewProduct::named(name, quantity))
            .await
            .unwrap()
            .inserted_id
    }

    async fn level(service: &InventoryService, id: &str) -> StockLevel {
        service
            .get_product(id)
            .await
            .unwrap()
            .unwrap()
            .stock_level()
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_fields() {
        let (service, _db) = service().await;

        let mut input = NewProduct::named("Bolt", 10);
        input.price = Some(0.25);
        input.supplier = Some("Acme Supply".into());
        input.attributes.insert("color".into(), json!("silver"));

        let id = service.create_product(input).await.unwrap().inserted_id;
        let product = service.get_product(&id).await.unwrap().unwrap();

        assert_eq!(product.id, id);
        assert_eq!(product.name.as_deref(), Some("Bolt"));
        assert_eq!(product.price, Some(0.25));
        assert_eq!(product.supplier.as_deref(), Some("Acme Supply"));
        assert_eq!(product.stock_level(), StockLevel::new(10, 0));
        assert_eq!(product.attributes["color"], json!("silver"));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let (service, _db) = service().await;

        let err = service
            .create_product(NewProduct::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let err = service
            .create_product(NewProduct::named("Bolt", -1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(ValidationError::Negative { .. }))
        ));

        let mut input = NewProduct::named("Bolt", 1);
        input.attributes.insert("_id".into(), json!("mine"));
        let err = service.create_product(input).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(ValidationError::ReadOnly { .. }))
        ));
    }

    #[tokio::test]
    async fn test_get_unknown_product_is_none() {
        let (service, _db) = service().await;
        let id = Uuid::new_v4().to_string();

        assert!(service.get_product(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected() {
        let (service, _db) = service().await;

        let err = service.get_product("not-a-uuid").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(ValidationError::InvalidFormat { .. }))
        ));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_none() {
        let (service, _db) = service().await;
        let id = create(&service, "Bolt", 10).await;

        assert_eq!(service.delete_product(&id).await.unwrap().deleted_count, 1);
        assert!(service.get_product(&id).await.unwrap().is_none());

        // Deleting again is not an error
        assert_eq!(service.delete_product(&id).await.unwrap().deleted_count, 0);
    }

    #[tokio::test]
    async fn test_restock_sets_absolute_quantity() {
        let (service, _db) = service().await;
        let id = create(&service, "Bolt", 10).await;

        service.sell_unit(&id, None).await.unwrap();
        let ack = service.restock(&id, 50).await.unwrap();
        assert_eq!(ack.matched_count, 1);
        assert_eq!(level(&service, &id).await, StockLevel::new(50, 1));

        service.restock(&id, 0).await.unwrap();
        assert_eq!(level(&service, &id).await, StockLevel::new(0, 1));
    }

    #[tokio::test]
    async fn test_restock_rejects_negative_quantity() {
        let (service, _db) = service().await;
        let id = create(&service, "Bolt", 10).await;

        let err = service.restock(&id, -5).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(ValidationError::Negative { .. }))
        ));
        assert_eq!(level(&service, &id).await, StockLevel::new(10, 0));
    }

    #[tokio::test]
    async fn test_restock_unknown_id_upserts() {
        let (service, _db) = service().await;
        let id = Uuid::new_v4().to_string();

        let ack = service.restock(&id, 7).await.unwrap();
        assert_eq!(ack.upserted_id.as_deref(), Some(id.as_str()));
        assert_eq!(level(&service, &id).await, StockLevel::new(7, 0));
    }

    #[tokio::test]
    async fn test_sell_with_matching_counters() {
        let (service, _db) = service().await;
        let id = create(&service, "Bolt", 10).await;

        let ack = service
            .sell_unit(&id, Some(StockLevel::new(10, 0)))
            .await
            .unwrap();
        assert_eq!(ack, UpdateAck::modified());
        assert_eq!(level(&service, &id).await, StockLevel::new(9, 1));
    }

    #[tokio::test]
    async fn test_sell_at_zero_stock_is_rejected() {
        let (service, _db) = service().await;
        let id = create(&service, "Bolt", 0).await;

        let err = service.sell_unit(&id, None).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::InsufficientStock { available: 0, .. })
        ));
        assert_eq!(level(&service, &id).await, StockLevel::new(0, 0));
    }

    #[tokio::test]
    async fn test_sell_unknown_product_is_not_found() {
        let (service, _db) = service().await;

        let err = service
            .sell_unit(&Uuid::new_v4().to_string(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn test_sell_with_stale_counters_is_conflict() {
        let (service, _db) = service().await;
        let id = create(&service, "Bolt", 10).await;
        service.restock(&id, 20).await.unwrap();

        let err = service
            .sell_unit(&id, Some(StockLevel::new(10, 0)))
            .await
            .unwrap_err();
        match err {
            ServiceError::Core(CoreError::StaleCounters {
                expected, actual, ..
            }) => {
                assert_eq!(expected, StockLevel::new(10, 0));
                assert_eq!(actual, StockLevel::new(20, 0));
            }
            other => panic!("expected StaleCounters, got {:?}", other),
        }
        assert_eq!(level(&service, &id).await, StockLevel::new(20, 0));
    }

    #[tokio::test]
    async fn test_sell_rejects_negative_expected_counters() {
        let (service, _db) = service().await;
        let id = create(&service, "Bolt", 10).await;

        let err = service
            .sell_unit(&id, Some(StockLevel::new(-1, 0)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(ValidationError::Negative { .. }))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_unguarded_sales_both_land() {
        let (service, _db) = service().await;
        let id = create(&service, "Bolt", 10).await;

        let (a, b) = tokio::join!(service.sell_unit(&id, None), service.sell_unit(&id, None));
        a.unwrap();
        b.unwrap();

        assert_eq!(level(&service, &id).await, StockLevel::new(8, 2));
    }

    #[tokio::test]
    async fn test_concurrent_guarded_sales_one_wins() {
        let (service, _db) = service().await;
        let id = create(&service, "Bolt", 10).await;
        let seen = StockLevel::new(10, 0);

        let (a, b) = tokio::join!(
            service.sell_unit(&id, Some(seen)),
            service.sell_unit(&id, Some(seen))
        );

        let results = [a, b];
        let wins = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| {
                matches!(
                    r,
                    Err(ServiceError::Core(CoreError::StaleCounters { .. }))
                )
            })
            .count();

        assert_eq!(wins, 1);
        assert_eq!(conflicts, 1);
        assert_eq!(level(&service, &id).await, StockLevel::new(9, 1));
    }

    #[tokio::test]
    async fn test_list_owned_requires_matching_identity() {
        let (service, _db) = service().await;
        let mine = create(&service, "Mine", 1).await;
        let theirs = create(&service, "Theirs", 1).await;
        create(&service, "Unowned", 1).await;

        service.assign_owner(&mine, "a@x.com").await.unwrap();
        service.assign_owner(&theirs, "b@x.com").await.unwrap();

        let caller = Identity::new("a@x.com");
        let owned = service.list_owned(Some("a@x.com"), &caller).await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, mine);

        let err = service.list_owned(Some("b@x.com"), &caller).await.unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::OwnerMismatch { .. })));
    }

    #[tokio::test]
    async fn test_list_owned_any_other_email_is_mismatch() {
        let (service, _db) = service().await;
        let caller = Identity::new("a@x.com");

        for requested in [None, Some("b-at-x.com"), Some(""), Some("A@X.COM")] {
            let err = service.list_owned(requested, &caller).await.unwrap_err();
            assert!(
                matches!(err, ServiceError::Core(CoreError::OwnerMismatch { .. })),
                "{requested:?} gave {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_create_rejects_counters_above_ceiling() {
        let (service, _db) = service().await;
        let mut input = NewProduct::named("Bolt", 5);
        input.sold = i64::MAX;

        let err = service.create_product(input).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(ValidationError::TooLarge { .. }))
        ));

        let err = service.restock(&Uuid::new_v4().to_string(), i64::MAX).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(ValidationError::TooLarge { .. }))
        ));
    }

    #[tokio::test]
    async fn test_sell_with_saturated_counter_keeps_store_readable() {
        let (service, db) = service().await;
        let mut input = NewProduct::named("Bolt", 5);
        input.sold = i64::MAX;
        let id = db.products().insert(input).await.unwrap().inserted_id;

        let err = service.sell_unit(&id, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::CounterOverflow { .. })));

        let err = service
            .sell_unit(&id, Some(StockLevel::new(1, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::CounterOverflow { .. })));

        assert_eq!(level(&service, &id).await, StockLevel::new(5, i64::MAX));
        assert_eq!(service.list_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_restock_to_current_quantity_is_unchanged() {
        let (service, _db) = service().await;
        let id = create(&service, "Bolt", 10).await;

        let ack = service.restock(&id, 10).await.unwrap();
        assert_eq!(ack, UpdateAck::unchanged());
    }

    #[tokio::test]
    async fn test_assign_owner_rejects_bad_email() {
        let (service, _db) = service().await;
        let id = create(&service, "Bolt", 1).await;

        let err = service.assign_owner(&id, "not-an-email").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(ValidationError::InvalidFormat { .. }))
        ));
    }

    #[tokio::test]
    async fn test_end_to_end_lifecycle() {
        let (service, _db) = service().await;

        let x = service
            .create_product(NewProduct::named("Bolt", 10))
            .await
            .unwrap()
            .inserted_id;

        service
            .sell_unit(&x, Some(StockLevel::new(10, 0)))
            .await
            .unwrap();
        assert_eq!(level(&service, &x).await, StockLevel::new(9, 1));

        service.restock(&x, 50).await.unwrap();
        assert_eq!(level(&service, &x).await, StockLevel::new(50, 1));

        service.assign_owner(&x, "a@x.com").await.unwrap();

        let caller = Identity::new("a@x.com");
        let owned = service.list_owned(Some("a@x.com"), &caller).await.unwrap();
        assert!(owned.iter().any(|p| p.id == x));

        let err = service.list_owned(Some("b@x.com"), &caller).await.unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::OwnerMismatch { .. })));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_store_error() {
        let (service, db) = service().await;
        db.close().await;

        let err = service.list_products().await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));
    }
}
