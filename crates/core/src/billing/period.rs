//! Billing periods.
//!
//! A billing period is the calendar month containing the reading date. At
//! most one statement exists per unit and period.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month, identified by its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillingPeriod {
    start: NaiveDate,
}

impl BillingPeriod {
    /// The period containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            start: date - Days::new(u64::from(date.day0())),
        }
    }

    /// First day of the month.
    #[must_use]
    pub const fn start(self) -> NaiveDate {
        self.start
    }

    /// Last day of the month.
    #[must_use]
    pub fn end(self) -> NaiveDate {
        self.start + Months::new(1) - Days::new(1)
    }

    /// Number of days in the month.
    #[must_use]
    pub fn days(self) -> u32 {
        self.end().day()
    }

    /// Whether `date` falls inside the month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end()
    }

    /// The following month.
    #[must_use]
    pub fn next(self) -> Self {
        Self {
            start: self.start + Months::new(1),
        }
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.start.format("%Y-%m"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(date(2024, 3, 15), date(2024, 3, 1), date(2024, 3, 31), 31)]
    #[case(date(2024, 2, 1), date(2024, 2, 1), date(2024, 2, 29), 29)]
    #[case(date(2023, 2, 28), date(2023, 2, 1), date(2023, 2, 28), 28)]
    #[case(date(2024, 12, 31), date(2024, 12, 1), date(2024, 12, 31), 31)]
    #[case(date(2024, 4, 30), date(2024, 4, 1), date(2024, 4, 30), 30)]
    fn test_period_bounds(
        #[case] reading: NaiveDate,
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
        #[case] days: u32,
    ) {
        let period = BillingPeriod::containing(reading);

        assert_eq!(period.start(), start);
        assert_eq!(period.end(), end);
        assert_eq!(period.days(), days);
        assert!(period.contains(reading));
    }

    #[test]
    fn test_same_month_same_period() {
        assert_eq!(
            BillingPeriod::containing(date(2024, 3, 1)),
            BillingPeriod::containing(date(2024, 3, 31))
        );
        assert_ne!(
            BillingPeriod::containing(date(2024, 3, 31)),
            BillingPeriod::containing(date(2024, 4, 1))
        );
    }

    #[test]
    fn test_next_rolls_over_year() {
        let period = BillingPeriod::containing(date(2024, 12, 10)).next();
        assert_eq!(period.start(), date(2025, 1, 1));
        assert_eq!(period.to_string(), "2025-01");
    }
}
