//! Scripted deterministic scenarios S001 through S018.
//!
//! Each scenario is data: an origin, a transition script, and billing
//! directives, all with fixed dates and amounts. They flow through the
//! same sequencer and artifact generator as the bulk-sampled population,
//! so their outputs stay consistent with the engine while remaining
//! hand-checkable. The three owning customers are flagged as test
//! accounts.

use crate::models::{
    Customer, Invoice, InvoiceLine, PlanCatalog, Subscription, SubscriptionEvent,
};
use crate::services::artifacts::{
    Adjustment, BillingArtifactGenerator, BillingDirectives, PeriodDirective,
};
use crate::services::lifecycle::{LifecycleSequencer, Origin, TransitionRequest};
use crate::services::periods::PeriodCalculator;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use datagen_core::error::AppError;
use datagen_core::ids::IdMinter;

/// One scripted scenario: fixed origin, transitions, and directives.
pub struct Scenario {
    pub subscription_id: &'static str,
    pub customer_id: &'static str,
    pub plan_id: &'static str,
    pub start_at: DateTime<Utc>,
    pub transitions: Vec<TransitionRequest>,
    /// Extra renewal horizon beyond the last transition.
    pub renew_until: Option<NaiveDate>,
    pub directives: BillingDirectives,
}

/// Combined output of the scripted scenarios.
pub struct ScenarioOutput {
    pub customers: Vec<Customer>,
    pub subscriptions: Vec<Subscription>,
    pub events: Vec<SubscriptionEvent>,
    pub invoices: Vec<Invoice>,
    pub invoice_lines: Vec<InvoiceLine>,
}

/// Runs the scripted scenarios through the sequencing and billing engine.
pub struct ScenarioCatalog<'a> {
    periods: &'a PeriodCalculator,
    catalog: &'a PlanCatalog,
}

impl<'a> ScenarioCatalog<'a> {
    pub fn new(periods: &'a PeriodCalculator, catalog: &'a PlanCatalog) -> Self {
        Self { periods, catalog }
    }

    /// Sequence every scripted scenario and emit its billing artifacts.
    ///
    /// Ids are scoped per subscription (`EVT_S001_01`, `INV_S001_01`) so
    /// scripted rows stay recognizable next to the bulk population.
    pub fn generate(&self) -> Result<ScenarioOutput, AppError> {
        let sequencer = LifecycleSequencer::new(self.periods, self.catalog);
        let artifacts = BillingArtifactGenerator::new(self.catalog);

        let mut out = ScenarioOutput {
            customers: test_customers(),
            subscriptions: Vec::new(),
            events: Vec::new(),
            invoices: Vec::new(),
            invoice_lines: Vec::new(),
        };

        for scenario in scripted_scenarios() {
            let mut ids = IdMinter::scoped(scenario.subscription_id);
            let origin = Origin {
                subscription_id: scenario.subscription_id.to_string(),
                customer_id: scenario.customer_id.to_string(),
                start_at: scenario.start_at,
                plan_id: scenario.plan_id.to_string(),
            };
            let lifecycle =
                sequencer.sequence(&origin, scenario.transitions, scenario.renew_until, &mut ids)?;
            let (invoices, lines) = artifacts.generate(&lifecycle, &scenario.directives, &mut ids)?;
            tracing::debug!(
                subscription_id = scenario.subscription_id,
                events = lifecycle.events.len(),
                invoices = invoices.len(),
                "sequenced scripted scenario"
            );
            out.subscriptions.push(lifecycle.snapshot);
            out.events.extend(lifecycle.events);
            out.invoices.extend(invoices);
            out.invoice_lines.extend(lines);
        }

        Ok(out)
    }
}

/// The three test-account customers that own S001 through S018.
pub fn test_customers() -> Vec<Customer> {
    let created_at = at(2024, 1, 1);
    vec![
        Customer {
            customer_id: "CUST_TEST_001".to_string(),
            customer_name: "Test Company S001-S006".to_string(),
            customer_segment: "SMB".to_string(),
            country: "DE".to_string(),
            created_at,
            is_test_account: true,
        },
        Customer {
            customer_id: "CUST_TEST_002".to_string(),
            customer_name: "Test Company S007-S012".to_string(),
            customer_segment: "Mid-Market".to_string(),
            country: "NL".to_string(),
            created_at,
            is_test_account: true,
        },
        Customer {
            customer_id: "CUST_TEST_003".to_string(),
            customer_name: "Test Company S013-S018".to_string(),
            customer_segment: "Enterprise".to_string(),
            country: "FR".to_string(),
            created_at,
            is_test_account: true,
        },
    ]
}

/// The scripted scenarios, in id order.
pub fn scripted_scenarios() -> Vec<Scenario> {
    vec![
        // S001: monthly happy path.
        Scenario {
            subscription_id: "S001",
            customer_id: "CUST_TEST_001",
            plan_id: "P_BASIC_M_30",
            start_at: at(2025, 1, 1),
            transitions: vec![],
            renew_until: None,
            directives: BillingDirectives::with_pay_delay(1),
        },
        // S002: annual happy path.
        Scenario {
            subscription_id: "S002",
            customer_id: "CUST_TEST_001",
            plan_id: "P_BASIC_A_300",
            start_at: at(2025, 1, 1),
            transitions: vec![],
            renew_until: None,
            directives: BillingDirectives::with_pay_delay(2),
        },
        // S003: churn inside the first period.
        Scenario {
            subscription_id: "S003",
            customer_id: "CUST_TEST_001",
            plan_id: "P_BASIC_M_30",
            start_at: at(2025, 1, 1),
            transitions: vec![TransitionRequest::Cancel {
                at: at(2025, 1, 20),
                reason: "Customer churn - first month".to_string(),
            }],
            renew_until: None,
            directives: BillingDirectives::with_pay_delay(1),
        },
        // S004: churn after eight renewals.
        Scenario {
            subscription_id: "S004",
            customer_id: "CUST_TEST_001",
            plan_id: "P_PRO_M_60",
            start_at: at(2025, 1, 1),
            transitions: vec![TransitionRequest::Cancel {
                at: at(2025, 9, 10),
                reason: "Customer churn - long tenure".to_string(),
            }],
            renew_until: None,
            directives: BillingDirectives::with_pay_delay(1),
        },
        // S005: mid-cycle upgrade, 20 of 30 days remaining.
        Scenario {
            subscription_id: "S005",
            customer_id: "CUST_TEST_001",
            plan_id: "P_BASIC_M_30",
            start_at: at(2025, 1, 1),
            transitions: vec![TransitionRequest::Upgrade {
                at: at(2025, 1, 11),
                to_plan_id: "P_PRO_M_60".to_string(),
                reason: "Upgrade".to_string(),
            }],
            renew_until: None,
            directives: BillingDirectives::with_pay_delay(1),
        },
        // S006: upgrade with only 3 days left in the period.
        Scenario {
            subscription_id: "S006",
            customer_id: "CUST_TEST_001",
            plan_id: "P_BASIC_M_30",
            start_at: at(2025, 1, 1),
            transitions: vec![TransitionRequest::Upgrade {
                at: at(2025, 1, 28),
                to_plan_id: "P_PRO_M_60".to_string(),
                reason: "Upgrade near period end".to_string(),
            }],
            renew_until: None,
            directives: BillingDirectives::with_pay_delay(1),
        },
        // S007: annual upgrade with 270 of 360 days remaining.
        Scenario {
            subscription_id: "S007",
            customer_id: "CUST_TEST_002",
            plan_id: "P_BASIC_A_300",
            start_at: at(2025, 1, 1),
            transitions: vec![TransitionRequest::Upgrade {
                at: at(2025, 4, 1),
                to_plan_id: "P_PRO_A_600".to_string(),
                reason: "Annual upgrade".to_string(),
            }],
            renew_until: None,
            directives: BillingDirectives::with_pay_delay(3),
        },
        // S008: upgrade five days in, 25 of 30 days remaining.
        Scenario {
            subscription_id: "S008",
            customer_id: "CUST_TEST_002",
            plan_id: "P_BASIC_M_30",
            start_at: at(2025, 1, 1),
            transitions: vec![TransitionRequest::Upgrade {
                at: at(2025, 1, 6),
                to_plan_id: "P_PRO_M_60".to_string(),
                reason: "First upgrade".to_string(),
            }],
            renew_until: None,
            directives: BillingDirectives::with_pay_delay(1),
        },
        // S009: monthly downgrade, deferred to the next renewal.
        Scenario {
            subscription_id: "S009",
            customer_id: "CUST_TEST_002",
            plan_id: "P_PRO_M_60",
            start_at: at(2025, 1, 1),
            transitions: vec![TransitionRequest::Downgrade {
                at: at(2025, 1, 10),
                to_plan_id: "P_BASIC_M_30".to_string(),
                reason: "Downgrade - effective next renewal".to_string(),
            }],
            renew_until: None,
            directives: BillingDirectives::with_pay_delay(1),
        },
        // S010: annual downgrade, deferred to the next renewal.
        Scenario {
            subscription_id: "S010",
            customer_id: "CUST_TEST_002",
            plan_id: "P_PRO_A_600",
            start_at: at(2025, 1, 1),
            transitions: vec![TransitionRequest::Downgrade {
                at: at(2025, 6, 1),
                to_plan_id: "P_BASIC_A_300".to_string(),
                reason: "Downgrade - effective next renewal".to_string(),
            }],
            renew_until: None,
            directives: BillingDirectives::with_pay_delay(3),
        },
        // S011: pause and resume within one period.
        Scenario {
            subscription_id: "S011",
            customer_id: "CUST_TEST_002",
            plan_id: "P_BASIC_M_30",
            start_at: at(2025, 1, 1),
            transitions: vec![
                TransitionRequest::Pause {
                    at: at(2025, 1, 15),
                    reason: "Customer requested pause".to_string(),
                },
                TransitionRequest::Resume {
                    at: at(2025, 1, 29),
                    reason: "Subscription resumed".to_string(),
                },
            ],
            renew_until: None,
            directives: BillingDirectives::with_pay_delay(1),
        },
        // S012: canceled while the pause is still open.
        Scenario {
            subscription_id: "S012",
            customer_id: "CUST_TEST_002",
            plan_id: "P_BASIC_M_30",
            start_at: at(2025, 1, 1),
            transitions: vec![
                TransitionRequest::Pause {
                    at: at(2025, 1, 10),
                    reason: "Customer requested pause".to_string(),
                },
                TransitionRequest::Cancel {
                    at: at(2025, 1, 20),
                    reason: "Canceled while paused".to_string(),
                },
            ],
            renew_until: None,
            directives: BillingDirectives::with_pay_delay(1),
        },
        // S013: cancel, then win the customer back.
        Scenario {
            subscription_id: "S013",
            customer_id: "CUST_TEST_003",
            plan_id: "P_BASIC_M_30",
            start_at: at(2025, 1, 1),
            transitions: vec![
                TransitionRequest::Cancel {
                    at: at(2025, 2, 10),
                    reason: "Customer churn".to_string(),
                },
                TransitionRequest::Reactivate {
                    at: at(2025, 3, 1),
                    reason: "Customer returned".to_string(),
                },
            ],
            renew_until: None,
            directives: BillingDirectives::with_pay_delay(1),
        },
        // S014: payment fails on the renewal date, recovers ten days later.
        // The renewal invoice falls inside the delinquency window and is
        // marked uncollectible.
        Scenario {
            subscription_id: "S014",
            customer_id: "CUST_TEST_003",
            plan_id: "P_BASIC_M_30",
            start_at: at(2025, 1, 1),
            transitions: vec![
                TransitionRequest::PaymentFailed {
                    at: at(2025, 1, 31),
                    reason: "Payment method declined".to_string(),
                },
                TransitionRequest::PaymentRecovered {
                    at: at(2025, 2, 10),
                    reason: "Payment recovered".to_string(),
                },
            ],
            renew_until: None,
            directives: BillingDirectives::with_pay_delay(1),
        },
        // S015: active subscription with a missing second invoice.
        Scenario {
            subscription_id: "S015",
            customer_id: "CUST_TEST_003",
            plan_id: "P_BASIC_M_30",
            start_at: at(2025, 1, 1),
            transitions: vec![],
            renew_until: NaiveDate::from_ymd_opt(2025, 1, 31),
            directives: {
                let mut d = BillingDirectives::with_pay_delay(1);
                d.set_period(
                    1,
                    PeriodDirective {
                        skip_invoice: true,
                        ..PeriodDirective::default()
                    },
                );
                d
            },
        },
        // S016: goodwill credit on an otherwise normal invoice.
        Scenario {
            subscription_id: "S016",
            customer_id: "CUST_TEST_003",
            plan_id: "P_BASIC_M_30",
            start_at: at(2025, 1, 1),
            transitions: vec![],
            renew_until: None,
            directives: {
                let mut d = BillingDirectives::with_pay_delay(1);
                d.set_period(
                    0,
                    PeriodDirective {
                        adjustment: Some(Adjustment {
                            amount: rust_decimal::Decimal::new(-500, 2),
                            description: "Billing adjustment - goodwill credit".to_string(),
                        }),
                        ..PeriodDirective::default()
                    },
                );
                d
            },
        },
        // S017: start on a month-end boundary date.
        Scenario {
            subscription_id: "S017",
            customer_id: "CUST_TEST_003",
            plan_id: "P_BASIC_M_30",
            start_at: at(2025, 1, 31),
            transitions: vec![],
            renew_until: None,
            directives: BillingDirectives::with_pay_delay(1),
        },
        // S018: annual plan started mid-quarter, upgraded 120 days in.
        Scenario {
            subscription_id: "S018",
            customer_id: "CUST_TEST_003",
            plan_id: "P_BASIC_A_300",
            start_at: at(2025, 2, 10),
            transitions: vec![TransitionRequest::Upgrade {
                at: at(2025, 6, 10),
                to_plan_id: "P_PRO_A_600".to_string(),
                reason: "Annual upgrade mid-term".to_string(),
            }],
            renew_until: None,
            directives: BillingDirectives::with_pay_delay(3),
        },
    ]
}

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("scripted scenario dates are valid")
        .and_time(NaiveTime::MIN)
        .and_utc()
}
