//! Billing period arithmetic.

use chrono::{Duration, NaiveDate};

/// Maps a period start date and a billing cadence to a period end date
/// using a fixed term-length-in-days table.
///
/// Every period boundary in the generator comes from this calculator, so
/// period N's end is exactly period N+1's start across any renewal chain.
/// Month-end start dates get no calendar special-casing: the end is pure
/// day arithmetic.
#[derive(Debug, Clone, Copy)]
pub struct PeriodCalculator {
    monthly_term_days: i64,
    annual_term_days: i64,
}

impl PeriodCalculator {
    pub fn new(monthly_term_days: i64, annual_term_days: i64) -> Self {
        Self {
            monthly_term_days,
            annual_term_days,
        }
    }

    /// Term length in days for a billing cadence.
    ///
    /// Monthly and annual cadences use the configured synthetic lengths;
    /// any other cadence falls back to `months * 30`.
    pub fn term_days(&self, billing_period_months: u32) -> i64 {
        match billing_period_months {
            1 => self.monthly_term_days,
            12 => self.annual_term_days,
            n => i64::from(n) * 30,
        }
    }

    /// Period end for a period starting at `start`.
    pub fn period_end(&self, start: NaiveDate, billing_period_months: u32) -> NaiveDate {
        start + Duration::days(self.term_days(billing_period_months))
    }
}

impl Default for PeriodCalculator {
    fn default() -> Self {
        Self::new(30, 360)
    }
}
