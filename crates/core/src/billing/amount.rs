//! Storage limits of money and meter values.
//!
//! Every amount, reading and rate is stored as `decimal(16, 4)`: at most 12
//! integer digits and 4 decimal places. Values outside that range are
//! rejected before any arithmetic runs on them.

use rust_decimal::Decimal;

use super::error::BillingError;

/// Decimal places kept in storage.
pub const STORED_SCALE: u32 = 4;

/// Largest magnitude a stored value may have: `999_999_999_999.9999`.
pub const MAX_STORED: Decimal = Decimal::from_parts(1_874_919_423, 2_328_306, 0, false, STORED_SCALE);

/// Checks that `value` fits a storage column.
///
/// Trailing zeros do not count towards the scale, so `1.50000` is accepted.
///
/// # Errors
///
/// Returns `Validation` naming `field` when the value has more than
/// [`STORED_SCALE`] decimal places or exceeds [`MAX_STORED`].
pub fn ensure_storable(field: &str, value: Decimal) -> Result<Decimal, BillingError> {
    if value.scale() > STORED_SCALE && value.normalize().scale() > STORED_SCALE {
        return Err(BillingError::Validation(format!(
            "{field} must have at most {STORED_SCALE} decimal places"
        )));
    }
    if value.abs() > MAX_STORED {
        return Err(out_of_range(field));
    }

    Ok(value)
}

/// Validation error for a value that does not fit storage.
pub(crate) fn out_of_range(field: &str) -> BillingError {
    BillingError::Validation(format!("{field} is out of range (max {MAX_STORED})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_max_stored_value() {
        assert_eq!(MAX_STORED, dec!(999999999999.9999));
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(1210.75))]
    #[case(dec!(1.50000))]
    #[case(dec!(999999999999.9999))]
    #[case(dec!(-999999999999.9999))]
    fn test_storable_values(#[case] value: Decimal) {
        assert_eq!(ensure_storable("amount", value).unwrap(), value);
    }

    #[rstest]
    #[case(dec!(1000000000000))]
    #[case(dec!(79228162514264337593543950335))]
    #[case(dec!(0.00001))]
    #[case(dec!(12.34567))]
    fn test_unstorable_values(#[case] value: Decimal) {
        assert!(matches!(
            ensure_storable("amount", value),
            Err(BillingError::Validation(_))
        ));
    }
}
