//! Test helper module for billing-datagen integration tests.

#![allow(dead_code)]

use billing_datagen::config::{
    DateRange, GeneratorConfig, InvoiceSettings, PlanConfig, Randomization, Sizes,
};
use billing_datagen::models::{Plan, PlanCatalog};
use billing_datagen::services::PeriodCalculator;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

/// Midnight UTC on the given date.
pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    date(year, month, day).and_time(NaiveTime::MIN).and_utc()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn plan(
    plan_id: &str,
    plan_name: &str,
    billing_period_months: u32,
    price: Decimal,
) -> Plan {
    Plan {
        plan_id: plan_id.to_string(),
        plan_name: plan_name.to_string(),
        currency: "EUR".to_string(),
        billing_period_months,
        price_per_period: price,
        mrr_equivalent: Plan::mrr_equivalent(price, billing_period_months),
        is_active: true,
    }
}

/// The standard four-plan catalog used across the tests.
pub fn test_catalog() -> PlanCatalog {
    PlanCatalog::new(vec![
        plan("P_BASIC_M_30", "Basic Monthly", 1, Decimal::from(30)),
        plan("P_PRO_M_60", "Pro Monthly", 1, Decimal::from(60)),
        plan("P_BASIC_A_300", "Basic Annual", 12, Decimal::from(300)),
        plan("P_PRO_A_600", "Pro Annual", 12, Decimal::from(600)),
    ])
}

pub fn test_periods() -> PeriodCalculator {
    PeriodCalculator::new(30, 360)
}

/// A complete valid configuration with a small randomized population.
pub fn test_config() -> GeneratorConfig {
    GeneratorConfig {
        seed: 42,
        currency: "EUR".to_string(),
        output_dir: "output".to_string(),
        log_level: "info".to_string(),
        monthly_term_days: 30,
        annual_term_days: 360,
        date_range: DateRange {
            start_date: date(2024, 6, 1),
            end_date: date(2025, 6, 30),
        },
        plans: vec![
            plan_config("P_BASIC_M_30", "Basic Monthly", 1, Decimal::from(30)),
            plan_config("P_PRO_M_60", "Pro Monthly", 1, Decimal::from(60)),
            plan_config("P_BASIC_A_300", "Basic Annual", 12, Decimal::from(300)),
            plan_config("P_PRO_A_600", "Pro Annual", 12, Decimal::from(600)),
        ],
        sizes: Sizes {
            random_customers: 8,
            random_subscriptions: 20,
        },
        randomization: Randomization {
            segments: vec![
                "SMB".to_string(),
                "Mid-Market".to_string(),
                "Enterprise".to_string(),
            ],
            countries: vec!["DE".to_string(), "NL".to_string(), "FR".to_string()],
            prob_upgrade: 0.15,
            prob_pause: 0.08,
            prob_cancel: 0.25,
            prob_delinquent: 0.07,
            prob_missing_invoice: 0.03,
            prob_adjustment_line: 0.05,
            adjustment_amounts: vec![
                Decimal::from(-10),
                Decimal::from(-5),
                Decimal::from(5),
                Decimal::from(10),
            ],
            upgrade_days_min: 3,
            pause_offset_min: 5,
            pause_offset_max: 20,
            pause_duration_min: 7,
            pause_duration_max: 21,
            cancel_days_min: 10,
            cancel_days_max: 120,
            delinquent_offset_min: 10,
            delinquent_offset_max: 60,
            recovery_days_min: 3,
            recovery_days_max: 14,
        },
        invoices: InvoiceSettings {
            pay_delay_days_min: 0,
            pay_delay_days_max: 5,
            prob_uncollectible: 0.04,
        },
    }
}

fn plan_config(
    plan_id: &str,
    plan_name: &str,
    billing_period_months: u32,
    price: Decimal,
) -> PlanConfig {
    PlanConfig {
        plan_id: plan_id.to_string(),
        plan_name: plan_name.to_string(),
        billing_period_months,
        price_per_period: price,
        is_active: true,
    }
}
