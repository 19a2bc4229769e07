//! Mid-period plan-change proration math.

use rust_decimal::Decimal;

/// Credit/charge pair for an upgrade part-way through a billing period.
///
/// The ratio `remaining_days / total_days` is exact decimal division.
/// Each leg is rounded to currency precision (2 decimal places, banker's
/// rounding) independently; the pair's sum is the amount due on the
/// proration invoice and is never re-rounded. Downgrades never call this:
/// they defer to the next renewal with zero proration.
pub fn prorate(
    old_price: Decimal,
    new_price: Decimal,
    remaining_days: i64,
    total_days: i64,
) -> (Decimal, Decimal) {
    let ratio = Decimal::from(remaining_days) / Decimal::from(total_days);
    let credit = (-old_price * ratio).round_dp(2);
    let charge = (new_price * ratio).round_dp(2);
    (credit, charge)
}
