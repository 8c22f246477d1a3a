//! Meter usage and cost calculation.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::amount::{STORED_SCALE, out_of_range};
use super::error::BillingError;

/// Consumption between two meter readings and its cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCost {
    /// Consumption, never negative.
    pub usage: Decimal,
    /// `usage * rate` rounded to storage scale, zero when no rate applies.
    pub cost: Decimal,
}

/// Computes consumption and cost for one utility.
///
/// A current reading below the previous one (meter swap, rollover) yields zero
/// usage rather than an error. A missing or zero rate yields zero cost while
/// the usage is still reported.
///
/// # Errors
///
/// Returns `Validation` when the arithmetic overflows.
pub fn compute_usage_cost(
    previous: Decimal,
    current: Decimal,
    rate: Option<Decimal>,
) -> Result<UsageCost, BillingError> {
    let usage = current
        .checked_sub(previous)
        .ok_or_else(|| out_of_range("meter usage"))?
        .max(Decimal::ZERO);
    let cost = match rate {
        Some(rate) if !rate.is_zero() => usage
            .checked_mul(rate)
            .ok_or_else(|| out_of_range("usage cost"))?
            .round_dp_with_strategy(STORED_SCALE, RoundingStrategy::MidpointAwayFromZero),
        _ => Decimal::ZERO,
    };

    Ok(UsageCost { usage, cost })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(100), dec!(150), Some(dec!(2.5)), dec!(50), dec!(125))]
    #[case(dec!(1200.5), dec!(1210.75), Some(dec!(12)), dec!(10.25), dec!(123))]
    #[case(dec!(150), dec!(100), Some(dec!(2.5)), dec!(0), dec!(0))]
    #[case(dec!(100), dec!(100), Some(dec!(2.5)), dec!(0), dec!(0))]
    #[case(dec!(100), dec!(130), Some(dec!(0)), dec!(30), dec!(0))]
    #[case(dec!(100), dec!(130), None, dec!(30), dec!(0))]
    fn test_compute_usage_cost(
        #[case] previous: Decimal,
        #[case] current: Decimal,
        #[case] rate: Option<Decimal>,
        #[case] usage: Decimal,
        #[case] cost: Decimal,
    ) {
        let result = compute_usage_cost(previous, current, rate).unwrap();

        assert_eq!(result.usage, usage);
        assert_eq!(result.cost, cost);
    }

    #[test]
    fn test_cost_rounded_to_storage_scale() {
        let result = compute_usage_cost(dec!(0), dec!(0.0003), Some(dec!(0.5))).unwrap();

        assert_eq!(result.cost, dec!(0.0002));
    }

    #[test]
    fn test_overflow_is_a_validation_error() {
        let huge = Decimal::MAX;

        assert!(matches!(
            compute_usage_cost(dec!(0), huge, Some(dec!(2))),
            Err(BillingError::Validation(_))
        ));
        assert!(matches!(
            compute_usage_cost(Decimal::MIN, huge, None),
            Err(BillingError::Validation(_))
        ));
    }
}
