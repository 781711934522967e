//! Token issuing (`POST /getToken`).

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
}

/// Signs the posted claims object. `email` is required.
#[instrument(skip(state, body))]
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(claims) = body?;

    let access_token = state.auth.jwt().issue(claims)?;
    info!("Access token issued");

    Ok(Json(TokenResponse { access_token }))
}
