//! Request DTOs for pricing API endpoints.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Request to quote an hourly rate for a booking.
///
/// `service_date` is RFC 3339 and keeps the customer's UTC offset; peak
/// hours and weekends are judged in that local time. `location` is part
/// of the contract but no current condition kind reads it.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub base_rate: Decimal,
    pub service_date: DateTime<FixedOffset>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub duration: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}
