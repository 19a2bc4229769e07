//! Subscription lifecycle event model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Created,
    PlanChanged,
    Canceled,
    Paused,
    Resumed,
    Reactivated,
    PaymentFailed,
    PaymentRecovered,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Created => "created",
            EventType::PlanChanged => "plan_changed",
            EventType::Canceled => "canceled",
            EventType::Paused => "paused",
            EventType::Resumed => "resumed",
            EventType::Reactivated => "reactivated",
            EventType::PaymentFailed => "payment_failed",
            EventType::PaymentRecovered => "payment_recovered",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "plan_changed" => EventType::PlanChanged,
            "canceled" => EventType::Canceled,
            "paused" => EventType::Paused,
            "resumed" => EventType::Resumed,
            "reactivated" => EventType::Reactivated,
            "payment_failed" => EventType::PaymentFailed,
            "payment_recovered" => EventType::PaymentRecovered,
            _ => EventType::Created,
        }
    }

    /// Tie-break rank for events sharing an `occurred_at` instant.
    pub fn precedence(&self) -> u8 {
        match self {
            EventType::Created => 0,
            EventType::PlanChanged => 1,
            EventType::Paused | EventType::Resumed => 2,
            EventType::Canceled => 3,
            EventType::Reactivated => 4,
            EventType::PaymentFailed | EventType::PaymentRecovered => 5,
        }
    }
}

/// An immutable fact about a lifecycle transition.
///
/// `effective_date` may be later than `occurred_at`: a downgrade is
/// recorded when requested but takes effect at the next renewal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionEvent {
    pub event_id: String,
    pub occurred_at: DateTime<Utc>,
    pub effective_date: NaiveDate,
    pub subscription_id: String,
    pub customer_id: String,
    pub event_type: EventType,
    pub old_plan_id: Option<String>,
    pub new_plan_id: Option<String>,
    pub reason: String,
}
