//! Liveness and readiness probes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Body of `GET /` so a browser pointed at the server sees it is up.
pub const LIVENESS_MESSAGE: &str = "Warehouse inventory server is running";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`
    pub status: &'static str,

    /// `connected`, `migrations_pending`, or `unavailable`
    pub database: &'static str,
}

/// `GET /`
pub async fn root() -> &'static str {
    LIVENESS_MESSAGE
}

/// `GET /health`: 200 when the store answers and its schema is current,
/// 503 otherwise.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = if !state.db.health_check().await {
        "unavailable"
    } else {
        match state.db.migration_status().await {
            Ok((total, applied)) if applied >= total => "connected",
            Ok(_) => "migrations_pending",
            Err(e) => {
                warn!(error = %e, "Failed to read migration status");
                "unavailable"
            }
        }
    };

    let (code, status) = if database == "connected" {
        (StatusCode::OK, "ok")
    } else {
        warn!(database, "Health check degraded");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (code, Json(HealthResponse { status, database }))
}
