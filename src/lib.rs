//! CleanerNow pricing service
//!
//! HTTP/JSON backend owning the dynamic hourly-rate calculation for the
//! CleanerNow marketplace. The booking front end posts a pricing context
//! (base rate, service date, duration) and gets back the adjusted rate
//! with a per-rule breakdown; rules live in Postgres and are cached in
//! memory.

pub mod cache;
pub mod error;
pub mod pricing;

use sqlx::PgPool;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::cache::AppCache;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
}

/// Assemble the application router with middleware
pub fn app(state: AppState) -> axum::Router {
    pricing::router()
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
