//! Response DTOs for pricing API endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

/// One breakdown line per evaluated rule.
///
/// `percent` is derived from the multiplier the rule actually applied,
/// so the lines always reconcile with `final_rate`; a rule whose
/// conditions did not match renders as 0%.
#[derive(Debug, Clone, Serialize)]
pub struct BreakdownLineResponse {
    pub rule_id: Uuid,
    pub rule_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub percent: Decimal,
}

/// Response for the quote endpoint.
///
/// `fallback` is true when the rule set could not be loaded or decoded;
/// in that case `final_rate` equals `base_rate`, the breakdown is empty,
/// and `fallback_reason` says why. The quote endpoint never fails a
/// booking over rule data.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub base_rate: MoneyResponse,
    pub final_rate: MoneyResponse,
    pub breakdown: Vec<BreakdownLineResponse>,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

/// Response for the rule listing endpoint
#[derive(Debug, Serialize)]
pub struct RuleResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub conditions: serde_json::Value,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_modifier: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
