//! Pricing service functions with database access.
//!
//! These functions sit between the HTTP routes and the pure calculator:
//! they load the active rule set (cache first, database on miss), decode
//! rule conditions, and re-run the calculator fresh on every request.
//! Rule-data and rule-source failures degrade to a base-rate quote with
//! `fallback` set; they never fail the booking flow.

use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::cache::AppCache;

use super::calculators::{calculate_hourly_rate, round_money, ConditionInput, RateRuleInput};
use super::models::PricingRule;
use super::queries;
use super::requests::QuoteRequest;
use super::responses::{BreakdownLineResponse, MoneyResponse, QuoteResponse, RuleResponse};

/// Pricing calculation error types
#[derive(Debug, Clone)]
pub enum PricingError {
    /// The request itself is unusable (non-positive base rate or duration)
    InvalidContext { message: String },
    /// A rule's conditions column could not be decoded
    MalformedRule {
        rule_id: Uuid,
        rule_name: String,
        reason: String,
    },
    /// The active rule set could not be fetched
    RuleSourceUnavailable { reason: String },
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::InvalidContext { message } => {
                write!(f, "Invalid pricing context: {}", message)
            }
            PricingError::MalformedRule {
                rule_id, rule_name, reason,
            } => {
                write!(f, "Malformed pricing rule {} ({}): {}", rule_name, rule_id, reason)
            }
            PricingError::RuleSourceUnavailable { reason } => {
                write!(f, "Pricing rule source unavailable: {}", reason)
            }
        }
    }
}

impl std::error::Error for PricingError {}

/// Quote the hourly rate for a booking.
///
/// Loads the active rule set, folds the base rate through it, and returns
/// the final rate with a per-rule breakdown. If the rule set cannot be
/// loaded or any rule is malformed, the whole evaluation is rejected and
/// the unmodified base rate comes back as a fallback quote - a wrong
/// price is worse than an undiscounted one.
///
/// Only an invalid request (non-positive base rate or duration) is an
/// error to the caller.
pub async fn quote_hourly_rate(
    pool: &PgPool,
    cache: &AppCache,
    request: &QuoteRequest,
) -> Result<QuoteResponse, PricingError> {
    if request.base_rate <= Decimal::ZERO {
        return Err(PricingError::InvalidContext {
            message: "base_rate must be positive".to_string(),
        });
    }
    if request.duration <= Decimal::ZERO {
        return Err(PricingError::InvalidContext {
            message: "duration must be positive".to_string(),
        });
    }

    let rules = match load_active_rules(pool, cache).await {
        Ok(rules) => rules,
        Err(err) => {
            warn!("Quote degraded to base rate: {}", err);
            return Ok(fallback_quote(request, err.to_string()));
        }
    };

    let rule_inputs = match decode_rules(&rules) {
        Ok(inputs) => inputs,
        Err(err) => {
            warn!("Quote degraded to base rate: {}", err);
            return Ok(fallback_quote(request, err.to_string()));
        }
    };

    let result = calculate_hourly_rate(
        request.base_rate,
        request.service_date,
        request.duration,
        &rule_inputs,
    );

    Ok(QuoteResponse {
        base_rate: MoneyResponse {
            amount: request.base_rate,
            currency: request.currency.clone(),
        },
        final_rate: MoneyResponse {
            amount: round_money(result.final_rate, 2),
            currency: request.currency.clone(),
        },
        breakdown: result
            .lines
            .into_iter()
            .map(|line| BreakdownLineResponse {
                rule_id: line.rule_id,
                rule_name: line.rule_name,
                percent: round_money(line.percent, 2),
            })
            .collect(),
        fallback: false,
        fallback_reason: None,
    })
}

/// List active pricing rules for the admin/breakdown UI
pub async fn list_active_rules(
    pool: &PgPool,
    cache: &AppCache,
) -> Result<Vec<RuleResponse>, PricingError> {
    let rules = load_active_rules(pool, cache).await?;

    Ok(rules
        .iter()
        .map(|rule| RuleResponse {
            id: rule.id,
            name: rule.name.clone(),
            description: rule.description.clone(),
            conditions: rule.conditions.clone(),
            price_modifier: rule.price_modifier,
            is_active: rule.is_active,
            created_at: rule.created_at,
        })
        .collect())
}

/// Load the active rule set, cache first
async fn load_active_rules(
    pool: &PgPool,
    cache: &AppCache,
) -> Result<Arc<Vec<PricingRule>>, PricingError> {
    if let Some(cached) = cache.rules.get(AppCache::ACTIVE_RULES_KEY).await {
        return Ok(cached);
    }

    let rules = queries::get_active_pricing_rules(pool)
        .await
        .map_err(|e| PricingError::RuleSourceUnavailable {
            reason: e.to_string(),
        })?;

    let rules = Arc::new(rules);
    cache
        .rules
        .insert(AppCache::ACTIVE_RULES_KEY.to_string(), rules.clone())
        .await;

    Ok(rules)
}

/// Decode every rule's conditions, rejecting the whole set on the first
/// malformed rule.
fn decode_rules(rules: &[PricingRule]) -> Result<Vec<RateRuleInput>, PricingError> {
    rules
        .iter()
        .map(|rule| {
            let conditions = rule
                .decode_conditions()
                .map_err(|e| PricingError::MalformedRule {
                    rule_id: rule.id,
                    rule_name: rule.name.clone(),
                    reason: e.to_string(),
                })?;

            Ok(RateRuleInput {
                id: rule.id,
                name: rule.name.clone(),
                conditions: conditions
                    .into_iter()
                    .map(|c| ConditionInput {
                        kind: c.kind,
                        value: c.value,
                    })
                    .collect(),
            })
        })
        .collect()
}

/// Base-rate quote used when rules cannot be loaded or decoded
fn fallback_quote(request: &QuoteRequest, reason: String) -> QuoteResponse {
    QuoteResponse {
        base_rate: MoneyResponse {
            amount: request.base_rate,
            currency: request.currency.clone(),
        },
        final_rate: MoneyResponse {
            amount: round_money(request.base_rate, 2),
            currency: request.currency.clone(),
        },
        breakdown: vec![],
        fallback: true,
        fallback_reason: Some(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn request() -> QuoteRequest {
        QuoteRequest {
            base_rate: dec!(50),
            service_date: "2025-06-14T10:00:00-05:00".parse().unwrap(),
            location: Some("Austin, TX".to_string()),
            duration: dec!(4),
            currency: "USD".to_string(),
        }
    }

    fn rule(name: &str, conditions: serde_json::Value) -> PricingRule {
        PricingRule {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            conditions,
            price_modifier: dec!(0.10),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::InvalidContext {
            message: "duration must be positive".to_string(),
        };
        assert!(err.to_string().contains("duration"));

        let id = Uuid::new_v4();
        let err = PricingError::MalformedRule {
            rule_id: id,
            rule_name: "Weekend".to_string(),
            reason: "invalid type".to_string(),
        };
        assert!(err.to_string().contains("Weekend"));
        assert!(err.to_string().contains(&id.to_string()));

        let err = PricingError::RuleSourceUnavailable {
            reason: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_decode_rules_rejects_whole_set_on_one_bad_rule() {
        let rules = vec![
            rule("Good", serde_json::json!([{ "type": "weekend", "value": 0.2 }])),
            rule("Bad", serde_json::json!({ "type": "weekend" })),
        ];

        match decode_rules(&rules) {
            Err(PricingError::MalformedRule { rule_name, .. }) => {
                assert_eq!(rule_name, "Bad");
            }
            other => panic!("expected MalformedRule, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rules_keeps_evaluation_order() {
        let rules = vec![
            rule("First", serde_json::json!([{ "type": "peak_hours", "value": 0.1 }])),
            rule("Second", serde_json::json!([{ "type": "weekend", "value": 0.2 }])),
        ];

        let inputs = decode_rules(&rules).unwrap();
        assert_eq!(inputs[0].name, "First");
        assert_eq!(inputs[1].name, "Second");
        assert_eq!(inputs[0].conditions[0].kind, "peak_hours");
    }

    #[test]
    fn test_fallback_quote_surfaces_base_rate() {
        let quote = fallback_quote(&request(), "rules unavailable".to_string());
        assert!(quote.fallback);
        assert_eq!(quote.final_rate.amount, quote.base_rate.amount);
        assert!(quote.breakdown.is_empty());
        assert_eq!(quote.fallback_reason.as_deref(), Some("rules unavailable"));
    }
}
