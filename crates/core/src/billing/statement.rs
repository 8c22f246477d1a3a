//! Statement totals and status rules.

use leasehold_shared::{ReopenPolicy, TotalPolicy};
use rust_decimal::Decimal;

use super::amount::out_of_range;
use super::charge::{Charge, net_charges};
use super::error::BillingError;
use super::types::{StatementRecord, StatementStatus};

/// `base_rent + water + electricity + Σadditional − Σdiscount`.
///
/// The result is not clamped; discounts may exceed the other components.
///
/// # Errors
///
/// Returns `Validation` when the sum overflows.
pub fn compute_total(
    base_rent: Decimal,
    water_cost: Decimal,
    electricity_cost: Decimal,
    charges: &[Charge],
) -> Result<Decimal, BillingError> {
    base_rent
        .checked_add(water_cost)
        .and_then(|t| t.checked_add(electricity_cost))
        .and_then(|t| t.checked_add(net_charges(charges)?))
        .ok_or_else(|| out_of_range("computed total"))
}

/// Cost component of one utility.
///
/// The computed cost wins when readings and a rate were both available,
/// then the caller's aggregate, then zero.
#[must_use]
pub fn utility_cost(computed: Option<Decimal>, supplied: Option<Decimal>) -> Decimal {
    computed.or(supplied).unwrap_or(Decimal::ZERO)
}

/// Applies the total policy.
///
/// Returns whether the totals disagree.
///
/// # Errors
///
/// Returns `TotalMismatch` under [`TotalPolicy::Reject`] when they disagree.
pub fn check_total(
    policy: TotalPolicy,
    supplied: Decimal,
    computed: Decimal,
) -> Result<bool, BillingError> {
    if policy == TotalPolicy::Trust || supplied == computed {
        return Ok(false);
    }

    match policy {
        TotalPolicy::Reject => Err(BillingError::TotalMismatch { supplied, computed }),
        TotalPolicy::Flag | TotalPolicy::Trust => Ok(true),
    }
}

/// Status handling of a re-saved statement whose total becomes `new_total`.
///
/// Under [`ReopenPolicy::Always`] every re-save reopens the statement, even a
/// paid one. Under [`ReopenPolicy::OnTotalChange`] the status only resets when
/// the total changes.
pub fn reopen(statement: &mut StatementRecord, policy: ReopenPolicy, new_total: Decimal) {
    let reset = match policy {
        ReopenPolicy::Always => true,
        ReopenPolicy::OnTotalChange => statement.total_due != new_total,
    };

    if reset {
        statement.status = StatementStatus::Unpaid;
        statement.paid_at = None;
    }
}
