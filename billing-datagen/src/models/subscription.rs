//! Subscription model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Subscription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Canceled => "canceled",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "canceled" => SubscriptionStatus::Canceled,
            _ => SubscriptionStatus::Active,
        }
    }
}

/// Terminal snapshot of a subscription.
///
/// The field values are the result of folding the subscription's full
/// event chain; the record is never mutated after emission. `plan_id` is
/// the plan in effect after all processed events, so a downgrade that has
/// not yet reached its renewal still shows the old plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub subscription_id: String,
    pub customer_id: String,
    pub plan_id: String,
    pub status: SubscriptionStatus,
    pub start_at: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub pause_start_at: Option<DateTime<Utc>>,
    pub pause_end_at: Option<DateTime<Utc>>,
    pub current_period_start: NaiveDate,
    pub current_period_end: NaiveDate,
    pub auto_renew: bool,
    pub created_at: DateTime<Utc>,
}
