//! Bulk randomized population sampling.
//!
//! Samples customers and subscription lifecycles from the configured
//! probabilities, resolves conflicting transition draws, and feeds each
//! subscription through the same sequencer and artifact generator as the
//! scripted scenarios. All randomness flows through the caller's seeded
//! generator.

use crate::config::GeneratorConfig;
use crate::models::{
    Customer, Invoice, InvoiceLine, Plan, PlanCatalog, Subscription, SubscriptionEvent,
};
use crate::services::artifacts::{
    Adjustment, BillingArtifactGenerator, BillingDirectives, PeriodDirective,
};
use crate::services::lifecycle::{LifecycleSequencer, Origin, TransitionRequest};
use crate::services::periods::PeriodCalculator;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use datagen_core::error::AppError;
use datagen_core::ids::{format_id, IdMinter};
use fake::faker::company::en::CompanyName;
use fake::Fake;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Id offset that keeps sampled ids clear of the scripted test rows.
const BULK_START_ID: u32 = 100;

/// Combined output of the sampled population.
pub struct SampledPopulation {
    pub customers: Vec<Customer>,
    pub subscriptions: Vec<Subscription>,
    pub events: Vec<SubscriptionEvent>,
    pub invoices: Vec<Invoice>,
    pub invoice_lines: Vec<InvoiceLine>,
}

/// Samples the randomized share of the dataset.
pub struct RandomGenerator<'a> {
    config: &'a GeneratorConfig,
    periods: &'a PeriodCalculator,
    catalog: &'a PlanCatalog,
}

impl<'a> RandomGenerator<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        periods: &'a PeriodCalculator,
        catalog: &'a PlanCatalog,
    ) -> Self {
        Self {
            config,
            periods,
            catalog,
        }
    }

    pub fn generate(&self, rng: &mut StdRng) -> Result<SampledPopulation, AppError> {
        let customers = self.sample_customers(rng);
        let mut out = SampledPopulation {
            customers,
            subscriptions: Vec::new(),
            events: Vec::new(),
            invoices: Vec::new(),
            invoice_lines: Vec::new(),
        };

        let sequencer = LifecycleSequencer::new(self.periods, self.catalog);
        let artifacts = BillingArtifactGenerator::new(self.catalog);
        // One id sequence across the whole sampled population.
        let mut ids = IdMinter::global();

        let range_start = midnight(self.config.date_range.start_date);
        let days_range =
            (self.config.date_range.end_date - self.config.date_range.start_date).num_days();

        for i in 0..self.config.sizes.random_subscriptions {
            let subscription_id = format_id("SUB", u64::from(BULK_START_ID + i), 4);
            let customer_id = match out.customers.choose(rng) {
                Some(customer) => customer.customer_id.clone(),
                None => break,
            };

            // Start early enough to leave room for lifecycle activity.
            let start_offset = rng.gen_range(0..(days_range - 60).max(1));
            let start_at = range_start + Duration::days(start_offset);
            let plan = match self.catalog.plans().choose(rng) {
                Some(plan) => plan,
                None => break,
            };

            let origin = Origin {
                subscription_id,
                customer_id,
                start_at,
                plan_id: plan.plan_id.clone(),
            };
            let transitions = self.sample_transitions(rng, &origin, plan);

            let lifecycle = sequencer.sequence(
                &origin,
                transitions,
                Some(self.config.date_range.end_date),
                &mut ids,
            )?;
            let directives = self.sample_directives(rng, lifecycle.periods.len());
            let (invoices, lines) = artifacts.generate(&lifecycle, &directives, &mut ids)?;

            out.subscriptions.push(lifecycle.snapshot);
            out.events.extend(lifecycle.events);
            out.invoices.extend(invoices);
            out.invoice_lines.extend(lines);
        }

        tracing::info!(
            customers = out.customers.len(),
            subscriptions = out.subscriptions.len(),
            "sampled randomized population"
        );
        Ok(out)
    }

    fn sample_customers(&self, rng: &mut StdRng) -> Vec<Customer> {
        let r = &self.config.randomization;
        let range_start = midnight(self.config.date_range.start_date);

        (0..self.config.sizes.random_customers)
            .map(|i| {
                // Existing accounts: created one to two years before the
                // observed window.
                let days_ago = rng.gen_range(365..730);
                Customer {
                    customer_id: format_id("CUST", u64::from(BULK_START_ID + i), 4),
                    customer_name: CompanyName().fake_with_rng::<String, _>(rng),
                    customer_segment: r
                        .segments
                        .choose(rng)
                        .cloned()
                        .unwrap_or_default(),
                    country: r.countries.choose(rng).cloned().unwrap_or_default(),
                    created_at: range_start - Duration::days(days_ago),
                    is_test_account: false,
                }
            })
            .collect()
    }

    /// Draw lifecycle transitions, then resolve conflicting draws so the
    /// script is always legal for the sequencer: a plan change never lands
    /// inside a pause, and nothing but the cancellation itself happens
    /// after it.
    fn sample_transitions(
        &self,
        rng: &mut StdRng,
        origin: &Origin,
        plan: &Plan,
    ) -> Vec<TransitionRequest> {
        let r = &self.config.randomization;
        let term_days = self.periods.term_days(plan.billing_period_months);
        let mut transitions = Vec::new();

        let mut upgrade = None;
        if rng.gen::<f64>() < r.prob_upgrade {
            let targets = self.catalog.upgrade_targets(plan);
            if let Some(target) = targets.choose(rng) {
                let days_into = rng.gen_range(
                    r.upgrade_days_min..(term_days - r.upgrade_days_min).max(r.upgrade_days_min + 1),
                );
                let at = origin.start_at + Duration::days(days_into);
                upgrade = Some((at, target.plan_id.clone()));
            }
        }

        let mut pause_window = None;
        if rng.gen::<f64>() < r.prob_pause {
            let high = r
                .pause_offset_max
                .min(term_days - 10)
                .max(r.pause_offset_min + 1);
            let pause_at = origin.start_at + Duration::days(rng.gen_range(r.pause_offset_min..high));
            let duration =
                rng.gen_range(r.pause_duration_min..r.pause_duration_max.max(r.pause_duration_min + 1));
            let resume_at = pause_at + Duration::days(duration);
            transitions.push(TransitionRequest::Pause {
                at: pause_at,
                reason: "Customer requested pause".to_string(),
            });
            transitions.push(TransitionRequest::Resume {
                at: resume_at,
                reason: "Subscription resumed".to_string(),
            });
            pause_window = Some((pause_at, resume_at));
        }

        // The pause wins a conflicting draw: an upgrade landing inside the
        // pause window is discarded, one outside it is kept.
        if let Some((at, to_plan_id)) = upgrade {
            let inside_pause = pause_window.map_or(false, |(start, end)| start <= at && at <= end);
            if !inside_pause {
                transitions.push(TransitionRequest::Upgrade {
                    at,
                    to_plan_id,
                    reason: "Upgrade".to_string(),
                });
            }
        }

        let mut cancel_at = None;
        if rng.gen::<f64>() < r.prob_cancel {
            let offset = rng.gen_range(r.cancel_days_min..r.cancel_days_max.max(r.cancel_days_min + 1));
            cancel_at = Some(origin.start_at + Duration::days(offset));
        }

        if cancel_at.is_none() && rng.gen::<f64>() < r.prob_delinquent {
            let failed_offset = rng.gen_range(
                r.delinquent_offset_min..r.delinquent_offset_max.max(r.delinquent_offset_min + 1),
            );
            let failed_at = origin.start_at + Duration::days(failed_offset);
            let recovery_days =
                rng.gen_range(r.recovery_days_min..r.recovery_days_max.max(r.recovery_days_min + 1));
            transitions.push(TransitionRequest::PaymentFailed {
                at: failed_at,
                reason: "Payment method failed".to_string(),
            });
            transitions.push(TransitionRequest::PaymentRecovered {
                at: failed_at + Duration::days(recovery_days),
                reason: "Payment recovered".to_string(),
            });
        }

        if let Some(cancel_at) = cancel_at {
            // A pause kept here may lose its resume; the sequencer accepts
            // a pause left open at cancellation.
            transitions.retain(|t| t.at() <= cancel_at);
            transitions.push(TransitionRequest::Cancel {
                at: cancel_at,
                reason: "Customer churn".to_string(),
            });
        }

        transitions
    }

    /// Per-period fault draws: missing invoices, uncollectible outcomes,
    /// adjustment lines, and payment delays.
    fn sample_directives(&self, rng: &mut StdRng, period_count: usize) -> BillingDirectives {
        let r = &self.config.randomization;
        let inv = &self.config.invoices;
        let mut directives = BillingDirectives::with_pay_delay(inv.pay_delay_days_min);

        for index in 0..period_count {
            let mut directive = PeriodDirective {
                skip_invoice: rng.gen::<f64>() < r.prob_missing_invoice,
                uncollectible: rng.gen::<f64>() < inv.prob_uncollectible,
                pay_delay_days: Some(rng.gen_range(inv.pay_delay_days_min..=inv.pay_delay_days_max)),
                adjustment: None,
            };
            if rng.gen::<f64>() < r.prob_adjustment_line {
                if let Some(amount) = r.adjustment_amounts.choose(rng) {
                    directive.adjustment = Some(Adjustment {
                        amount: *amount,
                        description: "Billing adjustment".to_string(),
                    });
                }
            }
            directives.set_period(index, directive);
        }

        directives
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
