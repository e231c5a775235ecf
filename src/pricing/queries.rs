//! Database queries for the pricing engine.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

use super::models::PricingRule;

/// Fetch all active pricing rules in evaluation order.
///
/// Evaluation order is insertion order (created_at, id as tiebreaker);
/// later rules compound on the result of earlier ones, so the ORDER BY
/// here is part of the pricing contract, not cosmetics.
pub async fn get_active_pricing_rules(pool: &PgPool) -> Result<Vec<PricingRule>, AppError> {
    let rules = sqlx::query_as::<_, PricingRule>(
        r#"
        SELECT id, name, description, conditions, price_modifier, is_active, created_at
        FROM pricing_rules
        WHERE is_active = true
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rules)
}

/// Fetch a single pricing rule by id (active or not)
pub async fn get_pricing_rule(pool: &PgPool, id: Uuid) -> Result<PricingRule, AppError> {
    sqlx::query_as::<_, PricingRule>(
        r#"
        SELECT id, name, description, conditions, price_modifier, is_active, created_at
        FROM pricing_rules
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}
