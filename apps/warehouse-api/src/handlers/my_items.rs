//! Owner-facing routes (`/myItems`).
//!
//! Only the listing is owner-scoped and goes through the auth gate. The
//! [`AuthenticatedUser`] extractor runs before the query string is parsed,
//! so an unauthenticated call never reaches the service.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::instrument;

use warehouse_core::{NewProduct, Product};
use warehouse_db::{DeleteAck, InsertAck, UpdateAck};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::AppState;

/// `?email=` of an owner-scoped listing.
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub email: Option<String>,
}

/// Body of an owner assignment.
#[derive(Debug, Deserialize)]
pub struct AssignOwnerRequest {
    pub email: String,
}

/// `POST /myItems`
#[instrument(skip(state, body))]
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> Result<Json<InsertAck>, ApiError> {
    let Json(product) = body?;

    Ok(Json(state.inventory.create_product(product).await?))
}

/// `GET /myItems?email=E` (bearer token for E required)
#[instrument(skip(state, caller, query))]
pub async fn list_my_items(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(caller): AuthenticatedUser,
    query: Result<Query<OwnerQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let Query(query) = query?;

    Ok(Json(state.inventory.list_owned(query.email.as_deref(), &caller).await?))
}

/// `DELETE /myItems/{id}`
#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, ApiError> {
    Ok(Json(state.inventory.delete_product(&id).await?))
}

/// `PUT /myItems/{id}`: assign the product to an owner.
#[instrument(skip(state, body))]
pub async fn assign_owner(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<AssignOwnerRequest>, JsonRejection>,
) -> Result<Json<UpdateAck>, ApiError> {
    let Json(body) = body?;

    Ok(Json(state.inventory.assign_owner(&id, &body.email).await?))
}
