//! Pricing route handlers

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::cache::CacheStats;
use crate::error::{AppError, Result};
use crate::AppState;

use super::requests::QuoteRequest;
use super::responses::{QuoteResponse, RuleResponse};
use super::services::{self, PricingError};

/// Build the pricing API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pricing/quote", post(quote))
        .route("/api/pricing/rules", get(list_rules))
        .route("/api/cache/stats", get(cache_stats))
        .route("/api/cache/invalidate", post(invalidate_cache))
        .route("/healthz", get(health))
}

/// Quote an hourly rate for a booking
async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let quote = services::quote_hourly_rate(&state.db, &state.cache, &request)
        .await
        .map_err(map_pricing_error)?;
    Ok(Json(quote))
}

/// List active pricing rules (admin listing and breakdown legend)
async fn list_rules(State(state): State<AppState>) -> Result<Json<Vec<RuleResponse>>> {
    let rules = services::list_active_rules(&state.db, &state.cache)
        .await
        .map_err(map_pricing_error)?;
    Ok(Json(rules))
}

/// Cache statistics for monitoring
async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

/// Drop cached rules; the next quote refetches from the database.
/// Called by the admin UI after editing pricing rules.
async fn invalidate_cache(State(state): State<AppState>) -> Json<CacheStats> {
    state.cache.invalidate_all();
    Json(state.cache.stats())
}

/// Liveness probe
async fn health() -> &'static str {
    "ok"
}

fn map_pricing_error(err: PricingError) -> AppError {
    match err {
        PricingError::InvalidContext { message } => AppError::Validation(message),
        other => AppError::Internal(other.to_string()),
    }
}
