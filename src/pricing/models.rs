//! Database models for the pricing engine.
//!
//! These models use sqlx's FromRow derive for direct database deserialization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Pricing rule from pricing_rules
///
/// `conditions` is stored as a jsonb array of `{type, value}` pairs and is
/// decoded lazily via [`PricingRule::decode_conditions`]. `price_modifier`
/// is a display-only aggregate kept for the admin rule listing; the quote
/// computation works from `conditions` alone.
#[derive(Debug, Clone, FromRow)]
pub struct PricingRule {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub conditions: serde_json::Value,
    pub price_modifier: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A single condition inside a rule's `conditions` array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleCondition {
    /// Condition kind: "peak_hours", "weekend", "duration_discount", or a
    /// future kind this engine does not know yet (ignored when applying).
    #[serde(rename = "type")]
    pub kind: String,
    /// Signed fractional modifier, e.g. 0.10 for +10%
    pub value: Decimal,
}

impl PricingRule {
    /// Decode the jsonb `conditions` column into typed conditions.
    ///
    /// A rule whose conditions are not an array of `{type, value}` pairs
    /// with numeric values is malformed; the caller must reject the whole
    /// evaluation rather than price a booking from partial rule data.
    pub fn decode_conditions(&self) -> Result<Vec<RuleCondition>, serde_json::Error> {
        serde_json::from_value(self.conditions.clone())
    }
}
