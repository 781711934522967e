//! # Warehouse API
//!
//! HTTP server for the warehouse inventory.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Warehouse API Server                             │
//! │                                                                         │
//! │  Client ──► axum Router ──► handlers ──► InventoryService ──► SQLite   │
//! │                 │                                                       │
//! │                 ├── TraceLayer (request spans)                          │
//! │                 └── CorsLayer  (any origin, method, header)             │
//! │                                                                         │
//! │  GET /myItems ──► AuthenticatedUser (AuthGuard) ──► list_owned         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Routes
//! ```text
//! POST   /getToken               claims → { accessToken }
//! GET    /products               all products
//! GET    /product/{id}           product or null
//! DELETE /product/{id}           DeleteAck
//! PATCH  /product/{id}           sell one unit → UpdateAck
//! PATCH  /product/restock/{id}   { newQuantity } → UpdateAck
//! POST   /myItems                create → InsertAck
//! GET    /myItems?email=E        owner's products (bearer token for E)
//! DELETE /myItems/{id}           DeleteAck
//! PUT    /myItems/{id}           { email } → UpdateAck
//! GET    /                       liveness
//! GET    /health                 readiness
//! ```
//!
//! ## Configuration
//! Environment variables (see [`config`]):
//! - `WAREHOUSE_HOST` / `WAREHOUSE_PORT` - Bind address (default: 0.0.0.0:5000)
//! - `WAREHOUSE_DATABASE_PATH` - SQLite file (default: ./warehouse.db)
//! - `WAREHOUSE_ACCESS_TOKEN_SECRET` - Secret for JWT signing
//! - `WAREHOUSE_ACCESS_TOKEN_LIFETIME_SECS` - Token lifetime (default: 86400)

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod services;

use std::sync::Arc;

use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use warehouse_db::Database;

use crate::auth::{AuthGuard, JwtManager};
use crate::handlers::{health, my_items, products, token};

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ErrorCode};
pub use services::InventoryService;

/// Shared application state.
pub struct AppState {
    pub inventory: InventoryService,
    pub auth: AuthGuard,
    pub config: ApiConfig,
    pub db: Database,
}

impl AppState {
    /// Wires the service and the auth gate onto an open database.
    pub fn new(config: ApiConfig, db: Database) -> Self {
        let inventory = InventoryService::new(Arc::new(db.products()));
        let auth = AuthGuard::new(JwtManager::new(
            config.access_token_secret.clone(),
            config.access_token_lifetime_secs,
        ));

        AppState {
            inventory,
            auth,
            config,
            db,
        }
    }
}

/// Builds the HTTP router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/getToken", post(token::issue_token))
        .route("/products", get(products::list_products))
        .route(
            "/product/{id}",
            get(products::get_product)
                .delete(products::delete_product)
                .patch(products::sell_unit),
        )
        .route("/product/restock/{id}", patch(products::restock))
        .route(
            "/myItems",
            post(my_items::create_item).get(my_items::list_my_items),
        )
        .route(
            "/myItems/{id}",
            put(my_items::assign_owner).delete(my_items::delete_item),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
