//! In-memory caching using moka
//!
//! Caches the active pricing rule set. Rules change rarely relative to
//! quote traffic, so a short TTL keeps quotes cheap while letting rule
//! edits show up within minutes; a stale set is simply superseded by the
//! next successful fetch.
//!
//! The cache is constructed once in main and handed to whatever needs it
//! through `AppState` - there is no hidden global, and the background
//! warmer task is spawned and aborted explicitly alongside the server.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::pricing::models::PricingRule;
use crate::pricing::queries;

/// Application cache holding the active pricing rule set
#[derive(Clone)]
pub struct AppCache {
    /// Active pricing rules (single entry under ACTIVE_RULES_KEY)
    pub rules: Cache<String, Arc<Vec<PricingRule>>>,
}

impl AppCache {
    /// Key under which the active rule set is stored
    pub const ACTIVE_RULES_KEY: &'static str = "pricing_rules:active";

    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Active rules: 5 min TTL, bounded in case per-segment rule
            // sets are added later
            rules: Cache::builder()
                .max_capacity(16)
                .time_to_live(Duration::from_secs(5 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            rules_size: self.rules.entry_count(),
            rules_cached: self.rules.contains_key(Self::ACTIVE_RULES_KEY),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.rules.invalidate_all();
        info!("Pricing rule cache invalidated");
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub rules_size: u64,
    pub rules_cached: bool,
}

/// Background cache warmer
///
/// Warms the rule cache on startup and refreshes every 4 minutes, inside
/// the 5 minute TTL, so quotes rarely pay the database round trip.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    warm_cache(&cache, &db).await;

    let mut interval = interval(Duration::from_secs(4 * 60));
    interval.tick().await; // first tick fires immediately
    loop {
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Refresh the active rule set in the cache
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    match queries::get_active_pricing_rules(db).await {
        Ok(rules) => {
            info!("Warmed pricing rule cache ({} active rules)", rules.len());
            cache
                .rules
                .insert(AppCache::ACTIVE_RULES_KEY.to_string(), Arc::new(rules))
                .await;
        }
        Err(e) => warn!("Failed to warm pricing rule cache: {}", e),
    }
}
