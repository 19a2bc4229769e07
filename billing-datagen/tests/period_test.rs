//! Period arithmetic tests for billing-datagen.

mod common;

use billing_datagen::services::PeriodCalculator;
use common::date;

#[test]
fn monthly_term_is_thirty_days() {
    let periods = PeriodCalculator::default();
    assert_eq!(periods.term_days(1), 30);
}

#[test]
fn annual_term_is_three_sixty_days() {
    let periods = PeriodCalculator::default();
    assert_eq!(periods.term_days(12), 360);
}

#[test]
fn other_cadences_fall_back_to_thirty_per_month() {
    let periods = PeriodCalculator::default();
    assert_eq!(periods.term_days(3), 90);
    assert_eq!(periods.term_days(6), 180);
}

#[test]
fn configured_term_lengths_override_defaults() {
    let periods = PeriodCalculator::new(28, 336);
    assert_eq!(periods.term_days(1), 28);
    assert_eq!(periods.term_days(12), 336);
}

#[test]
fn monthly_period_end_is_day_arithmetic() {
    let periods = PeriodCalculator::default();
    assert_eq!(periods.period_end(date(2025, 1, 1), 1), date(2025, 1, 31));
}

#[test]
fn month_end_start_gets_no_calendar_special_casing() {
    let periods = PeriodCalculator::default();
    // Jan 31 plus 30 days lands on Mar 2, not a month-end snap.
    assert_eq!(periods.period_end(date(2025, 1, 31), 1), date(2025, 3, 2));
}

#[test]
fn annual_period_end() {
    let periods = PeriodCalculator::default();
    assert_eq!(periods.period_end(date(2025, 2, 10), 12), date(2026, 2, 5));
}

#[test]
fn twelve_monthly_renewals_cover_one_annual_term() {
    let periods = PeriodCalculator::default();
    let mut start = date(2025, 1, 1);
    for _ in 0..12 {
        start = periods.period_end(start, 1);
    }
    assert_eq!(start, periods.period_end(date(2025, 1, 1), 12));
}
