//! Configuration loading and validation tests for billing-datagen.

mod common;

use billing_datagen::config::GeneratorConfig;
use common::test_config;
use datagen_core::error::AppError;
use rust_decimal::Decimal;
use std::io::Write;

const VALID_YAML: &str = r#"
seed: 42
currency: EUR
output_dir: out
log_level: debug

date_range:
  start_date: 2024-06-01
  end_date: 2025-06-30

plans:
  - plan_id: P_BASIC_M_30
    plan_name: Basic Monthly
    billing_period_months: 1
    price_per_period: 30.0
  - plan_id: P_BASIC_A_300
    plan_name: Basic Annual
    billing_period_months: 12
    price_per_period: 300.0

sizes:
  random_customers: 5
  random_subscriptions: 10

randomization:
  segments: [SMB, Enterprise]
  countries: [DE, NL]
  prob_upgrade: 0.15
  prob_pause: 0.08
  prob_cancel: 0.25
  prob_delinquent: 0.07
  prob_missing_invoice: 0.03
  prob_adjustment_line: 0.05
  adjustment_amounts: [-10.0, -5.0, 5.0, 10.0]
  upgrade_days_min: 3
  pause_offset_min: 5
  pause_offset_max: 20
  pause_duration_min: 7
  pause_duration_max: 21
  cancel_days_min: 10
  cancel_days_max: 120
  delinquent_offset_min: 10
  delinquent_offset_max: 60
  recovery_days_min: 3
  recovery_days_max: 14

invoices:
  pay_delay_days_min: 0
  pay_delay_days_max: 5
  prob_uncollectible: 0.04
"#;

#[test]
fn loads_a_valid_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(VALID_YAML.as_bytes()).unwrap();

    let config = GeneratorConfig::load(&path).unwrap();
    assert_eq!(config.seed, 42);
    assert_eq!(config.currency, "EUR");
    assert_eq!(config.output_dir, "out");
    assert_eq!(config.log_level, "debug");
    // Defaulted term lengths.
    assert_eq!(config.monthly_term_days, 30);
    assert_eq!(config.annual_term_days, 360);
    assert_eq!(config.plans.len(), 2);
    assert!(config.plans[0].is_active);
}

#[test]
fn plan_catalog_derives_mrr() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yml");
    std::fs::write(&path, VALID_YAML).unwrap();

    let config = GeneratorConfig::load(&path).unwrap();
    let catalog = config.plan_catalog();
    let annual = catalog.get("P_BASIC_A_300").unwrap();
    assert_eq!(annual.mrr_equivalent, Decimal::from(25));
    assert_eq!(annual.currency, "EUR");
}

#[test]
fn missing_file_is_a_config_error() {
    let result = GeneratorConfig::load(std::path::Path::new("/nonexistent/config.yml"));
    assert!(matches!(result, Err(AppError::ConfigError(_))));
}

#[test]
fn rejects_duplicate_plan_ids() {
    let mut config = test_config();
    config.plans[1].plan_id = config.plans[0].plan_id.clone();
    assert!(matches!(
        config.validate(),
        Err(AppError::ValidationError(_))
    ));
}

#[test]
fn rejects_non_positive_prices() {
    let mut config = test_config();
    config.plans[0].price_per_period = Decimal::ZERO;
    assert!(matches!(
        config.validate(),
        Err(AppError::ValidationError(_))
    ));
}

#[test]
fn rejects_empty_plan_catalog() {
    let mut config = test_config();
    config.plans.clear();
    assert!(matches!(
        config.validate(),
        Err(AppError::ValidationError(_))
    ));
}

#[test]
fn rejects_inverted_date_range() {
    let mut config = test_config();
    config.date_range.end_date = config.date_range.start_date;
    assert!(matches!(
        config.validate(),
        Err(AppError::ValidationError(_))
    ));
}

#[test]
fn rejects_out_of_range_probabilities() {
    let mut config = test_config();
    config.randomization.prob_cancel = 1.5;
    assert!(matches!(
        config.validate(),
        Err(AppError::ValidationError(_))
    ));
}

#[test]
fn rejects_inverted_sampling_windows() {
    let mut config = test_config();
    config.randomization.pause_offset_min = 30;
    config.randomization.pause_offset_max = 5;
    assert!(matches!(
        config.validate(),
        Err(AppError::ValidationError(_))
    ));
}

#[test]
fn rejects_adjustments_without_amounts() {
    let mut config = test_config();
    config.randomization.adjustment_amounts.clear();
    assert!(matches!(
        config.validate(),
        Err(AppError::ValidationError(_))
    ));
}

#[test]
fn accepts_the_test_fixture() {
    assert!(test_config().validate().is_ok());
}
