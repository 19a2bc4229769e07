//! Invoice and invoice-line generation.
//!
//! Walks a sequenced lifecycle's billing periods and materializes the
//! billing artifacts: one recurring invoice per billable period, plus a
//! standalone proration invoice for every mid-period upgrade. Directives
//! overlay data-quality faults (skipped invoices, uncollectible outcomes,
//! adjustment lines) onto individual periods.

use crate::models::{Invoice, InvoiceLine, InvoiceStatus, LineType, PlanCatalog};
use crate::services::lifecycle::{DelinquencyWindow, Lifecycle};
use crate::services::proration::prorate;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use datagen_core::error::AppError;
use datagen_core::ids::IdMinter;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// One extra non-recurring line on a recurring invoice.
#[derive(Debug, Clone)]
pub struct Adjustment {
    pub amount: Decimal,
    pub description: String,
}

/// Fault overlay for a single billing period.
#[derive(Debug, Clone, Default)]
pub struct PeriodDirective {
    /// Suppress the recurring invoice entirely (gap in the data).
    pub skip_invoice: bool,
    /// Force the recurring invoice uncollectible.
    pub uncollectible: bool,
    /// Override the default payment delay.
    pub pay_delay_days: Option<i64>,
    pub adjustment: Option<Adjustment>,
}

/// Per-subscription billing directives, keyed by period index.
#[derive(Debug, Clone)]
pub struct BillingDirectives {
    pub default_pay_delay_days: i64,
    per_period: BTreeMap<usize, PeriodDirective>,
}

impl BillingDirectives {
    pub fn with_pay_delay(days: i64) -> Self {
        Self {
            default_pay_delay_days: days,
            per_period: BTreeMap::new(),
        }
    }

    pub fn set_period(&mut self, index: usize, directive: PeriodDirective) {
        self.per_period.insert(index, directive);
    }

    pub fn for_period(&self, index: usize) -> PeriodDirective {
        self.per_period.get(&index).cloned().unwrap_or_default()
    }
}

impl Default for BillingDirectives {
    fn default() -> Self {
        Self::with_pay_delay(1)
    }
}

/// Generates invoices and invoice lines from a sequenced lifecycle.
pub struct BillingArtifactGenerator<'a> {
    catalog: &'a PlanCatalog,
}

impl<'a> BillingArtifactGenerator<'a> {
    pub fn new(catalog: &'a PlanCatalog) -> Self {
        Self { catalog }
    }

    /// Emit billing artifacts for every period of `lifecycle`.
    ///
    /// Recurring invoices come first within a period, then the proration
    /// invoices for upgrades that landed in it. An invoice's total is the
    /// sum of its lines and is never re-rounded.
    pub fn generate(
        &self,
        lifecycle: &Lifecycle,
        directives: &BillingDirectives,
        ids: &mut IdMinter,
    ) -> Result<(Vec<Invoice>, Vec<InvoiceLine>), AppError> {
        let mut invoices = Vec::new();
        let mut lines = Vec::new();
        let sub = &lifecycle.snapshot;

        for (index, period) in lifecycle.periods.iter().enumerate() {
            let directive = directives.for_period(index);

            if period.billable && !directive.skip_invoice {
                let plan = self.catalog.expect(&period.plan_id)?;
                // The first invoice carries the subscription's exact start
                // instant; renewals are issued at period-start midnight.
                let issued_at = if index == 0 {
                    sub.start_at
                } else {
                    midnight(period.start)
                };
                let uncollectible = directive.uncollectible
                    || delinquent_on(&lifecycle.delinquencies, issued_at.date_naive());
                let delay = directive
                    .pay_delay_days
                    .unwrap_or(directives.default_pay_delay_days);
                let (status, paid_at) = if uncollectible {
                    (InvoiceStatus::Uncollectible, None)
                } else {
                    (InvoiceStatus::Paid, Some(issued_at + Duration::days(delay)))
                };

                let invoice_id = ids.next_invoice_id();
                let mut invoice_lines = vec![InvoiceLine {
                    invoice_line_id: ids.next_line_id(),
                    invoice_id: invoice_id.clone(),
                    subscription_id: sub.subscription_id.clone(),
                    customer_id: sub.customer_id.clone(),
                    plan_id: plan.plan_id.clone(),
                    line_type: LineType::RecurringCharge,
                    amount: plan.price_per_period,
                    service_period_start: period.start,
                    service_period_end: period.end,
                    quantity: 1,
                    description: format!("{} - Recurring", plan.plan_name),
                }];
                if let Some(adjustment) = &directive.adjustment {
                    invoice_lines.push(InvoiceLine {
                        invoice_line_id: ids.next_line_id(),
                        invoice_id: invoice_id.clone(),
                        subscription_id: sub.subscription_id.clone(),
                        customer_id: sub.customer_id.clone(),
                        plan_id: plan.plan_id.clone(),
                        line_type: LineType::Adjustment,
                        amount: adjustment.amount,
                        service_period_start: period.start,
                        service_period_end: period.end,
                        quantity: 1,
                        description: adjustment.description.clone(),
                    });
                }
                let total_amount: Decimal = invoice_lines.iter().map(|l| l.amount).sum();

                invoices.push(Invoice {
                    invoice_id,
                    issued_at,
                    paid_at,
                    subscription_id: sub.subscription_id.clone(),
                    customer_id: sub.customer_id.clone(),
                    status,
                    currency: plan.currency.clone(),
                    invoice_period_start: period.start,
                    invoice_period_end: period.end,
                    total_amount,
                });
                lines.extend(invoice_lines);
            }

            // Proration invoices are issued even when the recurring invoice
            // for the period was suppressed: the plan change itself is not
            // a data-quality fault.
            for upgrade in lifecycle
                .upgrades
                .iter()
                .filter(|u| u.period_start == period.start)
            {
                let old_plan = self.catalog.expect(&upgrade.old_plan_id)?;
                let new_plan = self.catalog.expect(&upgrade.new_plan_id)?;
                let effective = upgrade.occurred_at.date_naive();
                let remaining_days = (upgrade.period_end - effective).num_days();
                let total_days = (upgrade.period_end - upgrade.period_start).num_days();
                let (credit, charge) = prorate(
                    old_plan.price_per_period,
                    new_plan.price_per_period,
                    remaining_days,
                    total_days,
                );

                let invoice_id = ids.next_invoice_id();
                let credit_line = InvoiceLine {
                    invoice_line_id: ids.next_line_id(),
                    invoice_id: invoice_id.clone(),
                    subscription_id: sub.subscription_id.clone(),
                    customer_id: sub.customer_id.clone(),
                    plan_id: old_plan.plan_id.clone(),
                    line_type: LineType::ProrationCredit,
                    amount: credit,
                    service_period_start: effective,
                    service_period_end: upgrade.period_end,
                    quantity: 1,
                    description: format!("Proration credit for {}", old_plan.plan_name),
                };
                let charge_line = InvoiceLine {
                    invoice_line_id: ids.next_line_id(),
                    invoice_id: invoice_id.clone(),
                    subscription_id: sub.subscription_id.clone(),
                    customer_id: sub.customer_id.clone(),
                    plan_id: new_plan.plan_id.clone(),
                    line_type: LineType::ProrationCharge,
                    amount: charge,
                    service_period_start: effective,
                    service_period_end: upgrade.period_end,
                    quantity: 1,
                    description: format!("Proration charge for {}", new_plan.plan_name),
                };

                // Proration invoices settle at issue time.
                invoices.push(Invoice {
                    invoice_id,
                    issued_at: upgrade.occurred_at,
                    paid_at: Some(upgrade.occurred_at),
                    subscription_id: sub.subscription_id.clone(),
                    customer_id: sub.customer_id.clone(),
                    status: InvoiceStatus::Paid,
                    currency: new_plan.currency.clone(),
                    invoice_period_start: effective,
                    invoice_period_end: upgrade.period_end,
                    total_amount: credit + charge,
                });
                lines.push(credit_line);
                lines.push(charge_line);
            }
        }

        Ok((invoices, lines))
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// True when `date` falls inside an unresolved delinquency window.
fn delinquent_on(windows: &[DelinquencyWindow], date: NaiveDate) -> bool {
    windows
        .iter()
        .any(|w| w.failed_on <= date && w.recovered_on.map_or(true, |r| date < r))
}
