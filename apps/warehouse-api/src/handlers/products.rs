//! Product catalogue routes (`/products`, `/product/{id}`).

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::instrument;

use warehouse_core::validation::validate_expected_counters;
use warehouse_core::Product;
use warehouse_db::{DeleteAck, UpdateAck};

use crate::error::ApiError;
use crate::AppState;

/// Body of a sale. The counters are the caller's last-known values and are
/// only used as a precondition; send `{}` to sell unconditionally.
#[derive(Debug, Deserialize)]
pub struct SellRequest {
    pub quantity: Option<i64>,
    pub sold: Option<i64>,
}

/// Body of a restock.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockRequest {
    pub new_quantity: i64,
}

/// `GET /products`
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.inventory.list_products().await?))
}

/// `GET /product/{id}`. An unknown id answers `null`.
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Option<Product>>, ApiError> {
    Ok(Json(state.inventory.get_product(&id).await?))
}

/// `DELETE /product/{id}`
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, ApiError> {
    Ok(Json(state.inventory.delete_product(&id).await?))
}

/// `PATCH /product/{id}`: sell one unit.
#[instrument(skip(state, body))]
pub async fn sell_unit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<SellRequest>, JsonRejection>,
) -> Result<Json<UpdateAck>, ApiError> {
    let Json(body) = body?;
    let expected = validate_expected_counters(body.quantity, body.sold)?;

    Ok(Json(state.inventory.sell_unit(&id, expected).await?))
}

/// `PATCH /product/restock/{id}`: set the quantity.
#[instrument(skip(state, body))]
pub async fn restock(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<RestockRequest>, JsonRejection>,
) -> Result<Json<UpdateAck>, ApiError> {
    let Json(body) = body?;

    Ok(Json(state.inventory.restock(&id, body.new_quantity).await?))
}
