//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - Billing, payment, and utility rate routes
//! - Bearer token authentication middleware
//! - Mapping of domain errors onto JSON error responses

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use leasehold_core::billing::{BillingService, RandomBillingIdGenerator};
use leasehold_db::SeaBillingStore;
use leasehold_shared::{BillingConfig, JwtService};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Billing assembler wired to the database store.
pub type Billing = BillingService<SeaBillingStore, RandomBillingIdGenerator>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Billing statement assembler.
    pub billing: Arc<Billing>,
}

impl AppState {
    /// Builds the state, wiring the billing service to `db`.
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt_service: JwtService, billing: BillingConfig) -> Self {
        let ids = RandomBillingIdGenerator::new(billing.id_prefix.clone());
        let store = Arc::new(SeaBillingStore::new(db.clone()));

        Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            billing: Arc::new(BillingService::new(store, ids, billing)),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
