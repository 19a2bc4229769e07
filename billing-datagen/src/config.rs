//! Generator configuration.
//!
//! Loaded from a YAML file with an environment overlay (`DATAGEN__` prefix)
//! and validated before any data is emitted: a bad plan catalog, inverted
//! date range, or out-of-range probability aborts the run at startup.

use crate::models::{Plan, PlanCatalog};
use anyhow::anyhow;
use chrono::NaiveDate;
use config::{Config as Cfg, Environment, File};
use datagen_core::error::AppError;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct PlanConfig {
    pub plan_id: String,
    pub plan_name: String,
    pub billing_period_months: u32,
    pub price_per_period: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Sizes {
    pub random_customers: u32,
    pub random_subscriptions: u32,
}

/// Transition probabilities and timing windows for bulk sampling.
#[derive(Debug, Clone, Deserialize)]
pub struct Randomization {
    pub segments: Vec<String>,
    pub countries: Vec<String>,
    pub prob_upgrade: f64,
    pub prob_pause: f64,
    pub prob_cancel: f64,
    pub prob_delinquent: f64,
    pub prob_missing_invoice: f64,
    pub prob_adjustment_line: f64,
    pub adjustment_amounts: Vec<Decimal>,
    pub upgrade_days_min: i64,
    pub pause_offset_min: i64,
    pub pause_offset_max: i64,
    pub pause_duration_min: i64,
    pub pause_duration_max: i64,
    pub cancel_days_min: i64,
    pub cancel_days_max: i64,
    pub delinquent_offset_min: i64,
    pub delinquent_offset_max: i64,
    pub recovery_days_min: i64,
    pub recovery_days_max: i64,
}

/// Invoice outcome knobs.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InvoiceSettings {
    pub pay_delay_days_min: i64,
    pub pay_delay_days_max: i64,
    pub prob_uncollectible: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub currency: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_monthly_term_days")]
    pub monthly_term_days: i64,
    #[serde(default = "default_annual_term_days")]
    pub annual_term_days: i64,
    pub date_range: DateRange,
    pub plans: Vec<PlanConfig>,
    pub sizes: Sizes,
    pub randomization: Randomization,
    pub invoices: InvoiceSettings,
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_monthly_term_days() -> i64 {
    30
}

fn default_annual_term_days() -> i64 {
    360
}

impl GeneratorConfig {
    /// Load and validate configuration from a file plus environment
    /// overrides.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("DATAGEN").separator("__"))
            .build()?;

        let config: GeneratorConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration; any failure is fatal at startup.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.plans.is_empty() {
            return Err(AppError::ValidationError(anyhow!("plan catalog is empty")));
        }
        for plan in &self.plans {
            if plan.plan_id.is_empty() {
                return Err(AppError::ValidationError(anyhow!("plan with empty id")));
            }
            if self.plans.iter().filter(|p| p.plan_id == plan.plan_id).count() > 1 {
                return Err(AppError::ValidationError(anyhow!(
                    "duplicate plan id: {}",
                    plan.plan_id
                )));
            }
            if plan.price_per_period <= Decimal::ZERO {
                return Err(AppError::ValidationError(anyhow!(
                    "plan {} has non-positive price {}",
                    plan.plan_id,
                    plan.price_per_period
                )));
            }
            if plan.billing_period_months == 0 {
                return Err(AppError::ValidationError(anyhow!(
                    "plan {} has unsupported billing cadence 0",
                    plan.plan_id
                )));
            }
        }
        if self.monthly_term_days <= 0 || self.annual_term_days <= 0 {
            return Err(AppError::ValidationError(anyhow!(
                "term lengths must be positive"
            )));
        }
        if self.date_range.start_date >= self.date_range.end_date {
            return Err(AppError::ValidationError(anyhow!(
                "date range start {} is not before end {}",
                self.date_range.start_date,
                self.date_range.end_date
            )));
        }

        let r = &self.randomization;
        let probabilities = [
            ("prob_upgrade", r.prob_upgrade),
            ("prob_pause", r.prob_pause),
            ("prob_cancel", r.prob_cancel),
            ("prob_delinquent", r.prob_delinquent),
            ("prob_missing_invoice", r.prob_missing_invoice),
            ("prob_adjustment_line", r.prob_adjustment_line),
            ("prob_uncollectible", self.invoices.prob_uncollectible),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(AppError::ValidationError(anyhow!(
                    "{} = {} is outside [0, 1]",
                    name,
                    p
                )));
            }
        }
        if r.prob_adjustment_line > 0.0 && r.adjustment_amounts.is_empty() {
            return Err(AppError::ValidationError(anyhow!(
                "adjustment lines enabled but adjustment_amounts is empty"
            )));
        }

        let windows = [
            ("pause_offset", r.pause_offset_min, r.pause_offset_max),
            ("pause_duration", r.pause_duration_min, r.pause_duration_max),
            ("cancel_days", r.cancel_days_min, r.cancel_days_max),
            (
                "delinquent_offset",
                r.delinquent_offset_min,
                r.delinquent_offset_max,
            ),
            ("recovery_days", r.recovery_days_min, r.recovery_days_max),
            (
                "pay_delay_days",
                self.invoices.pay_delay_days_min,
                self.invoices.pay_delay_days_max,
            ),
        ];
        for (name, min, max) in windows {
            if min < 0 || min > max {
                return Err(AppError::ValidationError(anyhow!(
                    "{} window [{}, {}] is invalid",
                    name,
                    min,
                    max
                )));
            }
        }
        if r.upgrade_days_min < 1 {
            return Err(AppError::ValidationError(anyhow!(
                "upgrade_days_min must be at least 1"
            )));
        }
        if r.segments.is_empty() || r.countries.is_empty() {
            return Err(AppError::ValidationError(anyhow!(
                "segments and countries must be non-empty"
            )));
        }

        Ok(())
    }

    /// Build the typed plan catalog from the configured plans.
    pub fn plan_catalog(&self) -> PlanCatalog {
        let plans = self
            .plans
            .iter()
            .map(|p| Plan {
                plan_id: p.plan_id.clone(),
                plan_name: p.plan_name.clone(),
                currency: self.currency.clone(),
                billing_period_months: p.billing_period_months,
                price_per_period: p.price_per_period,
                mrr_equivalent: Plan::mrr_equivalent(p.price_per_period, p.billing_period_months),
                is_active: p.is_active,
            })
            .collect();
        PlanCatalog::new(plans)
    }
}
