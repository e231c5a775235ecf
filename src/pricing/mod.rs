//! Pricing engine module for CleanerNow.
//!
//! Owns the dynamic hourly-rate calculation for the marketplace booking
//! flow. The customer front end calls this service via HTTP/JSON while
//! composing a booking and renders the returned breakdown.

pub mod calculators;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{calculate_hourly_rate, round_money};
pub use routes::router;
pub use services::PricingError;
