//! First-month rent proration.

use chrono::Datelike;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use super::amount::out_of_range;
use super::error::BillingError;
use super::period::BillingPeriod;

/// Decimal places of a prorated rent.
pub const RENT_SCALE: u32 = 2;

/// Base rent for `period` of a lease starting on `lease_start`.
///
/// When the lease starts after the first day of the period, rent is charged for
/// the occupied days only, rounded half away from zero to cents. A lease that
/// started before the period, or starts after it, pays the full monthly rent.
///
/// # Errors
///
/// Returns `Validation` when the arithmetic overflows.
pub fn prorated_rent(
    monthly_rent: Decimal,
    lease_start: NaiveDate,
    period: BillingPeriod,
) -> Result<Decimal, BillingError> {
    if lease_start <= period.start() || !period.contains(lease_start) {
        return Ok(monthly_rent);
    }

    let days = period.days();
    let occupied = days - lease_start.day0();

    monthly_rent
        .checked_mul(Decimal::from(occupied))
        .and_then(|rent| rent.checked_div(Decimal::from(days)))
        .map(|rent| rent.round_dp_with_strategy(RENT_SCALE, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| out_of_range("prorated rent"))
}
