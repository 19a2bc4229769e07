//! Proration math tests for billing-datagen.

mod common;

use billing_datagen::services::prorate;
use rust_decimal::Decimal;

#[test]
fn monthly_upgrade_two_thirds_remaining() {
    let (credit, charge) = prorate(Decimal::from(30), Decimal::from(60), 20, 30);
    assert_eq!(credit, Decimal::from(-20));
    assert_eq!(charge, Decimal::from(40));
    assert_eq!(credit + charge, Decimal::from(20));
}

#[test]
fn monthly_upgrade_three_days_remaining() {
    let (credit, charge) = prorate(Decimal::from(30), Decimal::from(60), 3, 30);
    assert_eq!(credit, Decimal::from(-3));
    assert_eq!(charge, Decimal::from(6));
}

#[test]
fn monthly_upgrade_five_days_in() {
    let (credit, charge) = prorate(Decimal::from(30), Decimal::from(60), 25, 30);
    assert_eq!(credit, Decimal::from(-25));
    assert_eq!(charge, Decimal::from(50));
}

#[test]
fn annual_upgrade_three_quarters_remaining() {
    let (credit, charge) = prorate(Decimal::from(300), Decimal::from(600), 270, 360);
    assert_eq!(credit, Decimal::from(-225));
    assert_eq!(charge, Decimal::from(450));
}

#[test]
fn annual_upgrade_two_thirds_remaining() {
    let (credit, charge) = prorate(Decimal::from(300), Decimal::from(600), 240, 360);
    assert_eq!(credit, Decimal::from(-200));
    assert_eq!(charge, Decimal::from(400));
}

#[test]
fn legs_round_independently_and_the_sum_is_kept() {
    // 1/3 of 10 and 1/3 of 20 each round to cents on their own; the sum
    // 3.34 differs from rounding the combined value once.
    let (credit, charge) = prorate(Decimal::from(10), Decimal::from(20), 1, 3);
    assert_eq!(credit, Decimal::new(-333, 2));
    assert_eq!(charge, Decimal::new(667, 2));
    assert_eq!(credit + charge, Decimal::new(334, 2));
}

#[test]
fn full_period_remaining_swaps_the_whole_price() {
    let (credit, charge) = prorate(Decimal::from(30), Decimal::from(60), 30, 30);
    assert_eq!(credit, Decimal::from(-30));
    assert_eq!(charge, Decimal::from(60));
}
