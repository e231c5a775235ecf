//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no database access.
//! The quote endpoint feeds these with rules decoded from the database;
//! everything here is deterministic for a fixed (rules, context) pair.

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Weekday};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use uuid::Uuid;

/// Peak window is 09:00-17:59 inclusive of both boundary hours, in the
/// customer's local time (the offset carried by the service date).
const PEAK_START_HOUR: u32 = 9;
const PEAK_END_HOUR: u32 = 17;

/// Bookings of at least this many hours qualify for duration discounts.
const DURATION_DISCOUNT_MIN_HOURS: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use cleanernow_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// A rule with its conditions already decoded, in evaluation order
#[derive(Debug, Clone)]
pub struct RateRuleInput {
    pub id: Uuid,
    pub name: String,
    pub conditions: Vec<ConditionInput>,
}

/// A decoded condition (kind string + signed fractional modifier)
#[derive(Debug, Clone)]
pub struct ConditionInput {
    pub kind: String,
    pub value: Decimal,
}

/// One breakdown line per evaluated rule.
///
/// `factor` is the multiplier this rule actually applied to the running
/// rate (1 when none of its conditions matched), so the breakdown always
/// reconciles with the computed rate: base * prod(factor) == final.
#[derive(Debug, Clone)]
pub struct RateLine {
    pub rule_id: Uuid,
    pub rule_name: String,
    pub factor: Decimal,
    /// Effective percentage for display, (factor - 1) * 100
    pub percent: Decimal,
}

/// Result of the hourly rate calculation
#[derive(Debug, Clone)]
pub struct RateResult {
    pub final_rate: Decimal,
    pub lines: Vec<RateLine>,
}

/// Fold a base hourly rate through an ordered rule set.
///
/// Rules apply in the order supplied and conditions apply in order within
/// each rule; every matching condition compounds multiplicatively on the
/// running rate, not on the original base. Unknown condition kinds are a
/// forward-compatible no-op. With no matching conditions the result is
/// exactly `base_rate`.
///
/// # Arguments
/// * `base_rate` - Hourly rate before adjustments
/// * `service_date` - Appointment start, carrying the customer's UTC offset
/// * `duration` - Booking length in hours
/// * `rules` - Active rules in evaluation order
pub fn calculate_hourly_rate(
    base_rate: Decimal,
    service_date: DateTime<FixedOffset>,
    duration: Decimal,
    rules: &[RateRuleInput],
) -> RateResult {
    let hour = service_date.hour();
    let is_weekend = matches!(service_date.weekday(), Weekday::Sat | Weekday::Sun);
    let is_peak = (PEAK_START_HOUR..=PEAK_END_HOUR).contains(&hour);
    let long_booking = duration >= DURATION_DISCOUNT_MIN_HOURS;

    let mut final_rate = base_rate;
    let mut lines = Vec::with_capacity(rules.len());

    for rule in rules {
        let mut factor = Decimal::ONE;
        for condition in &rule.conditions {
            match condition.kind.as_str() {
                "peak_hours" => {
                    if is_peak {
                        factor *= Decimal::ONE + condition.value;
                    }
                }
                "weekend" => {
                    if is_weekend {
                        factor *= Decimal::ONE + condition.value;
                    }
                }
                "duration_discount" => {
                    if long_booking {
                        factor *= Decimal::ONE - condition.value;
                    }
                }
                _ => {}
            }
        }

        final_rate *= factor;
        lines.push(RateLine {
            rule_id: rule.id,
            rule_name: rule.name.clone(),
            factor,
            percent: (factor - Decimal::ONE) * Decimal::from(100),
        });
    }

    RateResult { final_rate, lines }
}
