//! Invoice and invoice line models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Invoice settlement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Paid,
    Uncollectible,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Uncollectible => "uncollectible",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "uncollectible" => InvoiceStatus::Uncollectible,
            _ => InvoiceStatus::Paid,
        }
    }
}

/// Invoice line kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    RecurringCharge,
    ProrationCredit,
    ProrationCharge,
    Adjustment,
}

impl LineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineType::RecurringCharge => "recurring_charge",
            LineType::ProrationCredit => "proration_credit",
            LineType::ProrationCharge => "proration_charge",
            LineType::Adjustment => "adjustment",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "proration_credit" => LineType::ProrationCredit,
            "proration_charge" => LineType::ProrationCharge,
            "adjustment" => LineType::Adjustment,
            _ => LineType::RecurringCharge,
        }
    }
}

/// A billing document for one period or partial period.
///
/// `total_amount` is always the exact sum of the owned lines' amounts;
/// `paid_at` is absent iff `status` is uncollectible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,
    pub issued_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub subscription_id: String,
    pub customer_id: String,
    pub status: InvoiceStatus,
    pub currency: String,
    pub invoice_period_start: NaiveDate,
    pub invoice_period_end: NaiveDate,
    pub total_amount: Decimal,
}

/// One charge, credit, or adjustment component of an invoice.
///
/// Proration credits are negative, proration and recurring charges are
/// positive, adjustments carry either sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub invoice_line_id: String,
    pub invoice_id: String,
    pub subscription_id: String,
    pub customer_id: String,
    pub plan_id: String,
    pub line_type: LineType,
    pub amount: Decimal,
    pub service_period_start: NaiveDate,
    pub service_period_end: NaiveDate,
    pub quantity: u32,
    pub description: String,
}
