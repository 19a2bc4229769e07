//! Billing plan model.

use datagen_core::error::AppError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A priced billing tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub plan_id: String,
    pub plan_name: String,
    pub currency: String,
    /// Billing cadence: 1 for monthly, 12 for annual.
    pub billing_period_months: u32,
    pub price_per_period: Decimal,
    /// Monthly-recurring-revenue equivalent: price / period months.
    pub mrr_equivalent: Decimal,
    pub is_active: bool,
}

impl Plan {
    pub fn mrr_equivalent(price_per_period: Decimal, billing_period_months: u32) -> Decimal {
        (price_per_period / Decimal::from(billing_period_months)).round_dp(2)
    }
}

/// Plan catalog keyed by plan id.
#[derive(Debug, Clone, Default)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
}

impl PlanCatalog {
    pub fn new(plans: Vec<Plan>) -> Self {
        Self { plans }
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn get(&self, plan_id: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.plan_id == plan_id)
    }

    /// Look up a plan, failing with a fatal error for unknown ids.
    pub fn expect(&self, plan_id: &str) -> Result<&Plan, AppError> {
        self.get(plan_id)
            .ok_or_else(|| AppError::UnknownPlan(plan_id.to_string()))
    }

    /// Active plans with the same cadence and a strictly higher price:
    /// the valid targets of an upgrade from `plan`.
    pub fn upgrade_targets(&self, plan: &Plan) -> Vec<&Plan> {
        self.plans
            .iter()
            .filter(|p| {
                p.is_active
                    && p.billing_period_months == plan.billing_period_months
                    && p.price_per_period > plan.price_per_period
            })
            .collect()
    }
}
