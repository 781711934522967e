//! # Product Repository
//!
//! SQLite-backed [`ProductStore`].
//!
//! ## Document Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Product document  ⇄  products row                      │
//! │                                                                         │
//! │  { "_id": "1b4e…",            id          TEXT PRIMARY KEY             │
//! │    "name": "Bolt",            name        TEXT                         │
//! │    "quantity": 9,             quantity    INTEGER                      │
//! │    "sold": 1,                 sold        INTEGER                      │
//! │    "email": "a@x.com",        email       TEXT                         │
//! │    "color": "silver",  ──┐                                             │
//! │    "dimensions": {…} } ──┴──► attributes  TEXT  ('{"color":…}')        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Sale Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UPDATE products                                                        │
//! │     SET quantity = quantity - 1, sold = sold + 1                       │
//! │   WHERE id = ?  AND quantity > 0                                       │
//! │     [AND quantity = ? AND sold = ?]      ← caller's counters, if given │
//! │  RETURNING quantity, sold                                              │
//! │                                                                         │
//! │  Request A ─┐                                                          │
//! │             ├─► SQLite serializes writers: both decrements land,       │
//! │  Request B ─┘   or the guarded one that lost the race matches 0 rows   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::store::{DeleteAck, InsertAck, ProductFilter, ProductPatch, ProductStore, UpdateAck};
use warehouse_core::{NewProduct, Product, StockLevel};

/// Column list shared by every product SELECT.
const PRODUCT_COLUMNS: &str = "id, name, category, description, supplier, image, price, \
     quantity, sold, email, attributes, created_at, updated_at";

/// Raw `products` row before the attributes column is decoded.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: Option<String>,
    category: Option<String>,
    description: Option<String>,
    supplier: Option<String>,
    image: Option<String>,
    price: Option<f64>,
    quantity: i64,
    sold: i64,
    email: Option<String>,
    attributes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let attributes: Map<String, Value> =
            serde_json::from_str(&row.attributes).map_err(|e| DbError::corrupt(&row.id, e))?;

        Ok(Product {
            id: row.id,
            name: row.name,
            category: row.category,
            description: row.description,
            supplier: row.supplier,
            image: row.image,
            price: row.price,
            quantity: row.quantity,
            sold: row.sold,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
            attributes,
        })
    }
}

/// Repository for product documents.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let ack = repo.insert(NewProduct::named("Bolt", 10)).await?;
/// let sold = repo.apply_sale(&ack.inserted_id, None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn find_all(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        debug!(email = ?filter.email, "Listing products");

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE (?1 IS NULL OR email = ?1) \
             ORDER BY rowid"
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(filter.email.as_deref())
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed products");
        rows.into_iter().map(Product::try_from).collect()
    }

    async fn find_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    async fn insert(&self, product: NewProduct) -> DbResult<InsertAck> {
        let id = generate_product_id();
        let product = Product::from_new(id.clone(), product, Utc::now());
        let attributes = Value::Object(product.attributes).to_string();

        debug!(id = %id, name = ?product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, category, description, supplier, image, price,
                quantity, sold, email, attributes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.description)
        .bind(&product.supplier)
        .bind(&product.image)
        .bind(product.price)
        .bind(product.quantity)
        .bind(product.sold)
        .bind(&product.email)
        .bind(&attributes)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("id", &id),
            other => other,
        })?;

        Ok(InsertAck::new(id))
    }

    async fn delete_by_id(&self, id: &str) -> DbResult<DeleteAck> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(DeleteAck::new(result.rows_affected()))
    }

    /// Writes only when a patched field differs from the stored one. A row
    /// that exists but needed no change is reported as unchanged; a missing
    /// row is inserted when `upsert` is set. All steps share one transaction
    /// so a concurrent insert of the same id can't slip in between.
    async fn update_fields(
        &self,
        id: &str,
        patch: ProductPatch,
        upsert: bool,
    ) -> DbResult<UpdateAck> {
        debug!(id = %id, ?patch, upsert, "Updating product fields");

        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                quantity = COALESCE(?2, quantity),
                sold = COALESCE(?3, sold),
                email = COALESCE(?4, email),
                updated_at = ?5
            WHERE id = ?1
              AND (
                   (?2 IS NOT NULL AND quantity IS NOT ?2)
                OR (?3 IS NOT NULL AND sold IS NOT ?3)
                OR (?4 IS NOT NULL AND email IS NOT ?4)
              )
            "#,
        )
        .bind(id)
        .bind(patch.quantity)
        .bind(patch.sold)
        .bind(patch.email.as_deref())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let matched: i64 = if result.rows_affected() > 0 {
            1
        } else {
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = ?1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?
        };

        let ack = if result.rows_affected() > 0 {
            UpdateAck::modified()
        } else if matched > 0 {
            UpdateAck::unchanged()
        } else if upsert {
            sqlx::query(
                r#"
                INSERT INTO products (id, quantity, sold, email, attributes, created_at, updated_at)
                VALUES (?1, COALESCE(?2, 0), COALESCE(?3, 0), ?4, '{}', ?5, ?5)
                "#,
            )
            .bind(id)
            .bind(patch.quantity)
            .bind(patch.sold)
            .bind(patch.email.as_deref())
            .bind(now)
            .execute(&mut *tx)
            .await?;

            debug!(id = %id, "Upserted minimal product record");
            UpdateAck::upserted(id)
        } else {
            UpdateAck::unmatched()
        };

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(ack)
    }

    async fn apply_sale(
        &self,
        id: &str,
        expected: Option<StockLevel>,
    ) -> DbResult<Option<StockLevel>> {
        debug!(id = %id, ?expected, "Applying sale");

        let counters: Option<(i64, i64)> = sqlx::query_as(
            r#"
            UPDATE products
            SET
                quantity = quantity - 1,
                sold = sold + 1,
                updated_at = ?2
            WHERE id = ?1
              AND quantity > 0
              AND sold < 9223372036854775807
              AND (?3 IS NULL OR (quantity = ?3 AND sold = ?4))
            RETURNING quantity, sold
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .bind(expected.map(|level| level.quantity))
        .bind(expected.map(|level| level.sold))
        .fetch_optional(&self.pool)
        .await?;

        Ok(counters.map(|(quantity, sold)| StockLevel::new(quantity, sold)))
    }

    async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new product id.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
