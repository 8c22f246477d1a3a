//! Payment confirmation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::amount::ensure_storable;
use super::error::BillingError;
use super::types::{StatementRecord, StatementStatus};

/// Records a payment of `amount` against `statement`.
///
/// The statement becomes `paid` once the amount paid reaches the total due;
/// `paid_at` keeps the first time that happened.
///
/// # Errors
///
/// Returns `InvalidPayment` if `amount` is not positive, or if it or the
/// resulting amount paid does not fit storage.
pub fn apply_payment(
    statement: &mut StatementRecord,
    amount: Decimal,
    now: DateTime<Utc>,
) -> Result<(), BillingError> {
    if amount <= Decimal::ZERO {
        return Err(BillingError::InvalidPayment(format!(
            "payment amount must be positive, got {amount}"
        )));
    }

    let paid = ensure_storable("payment amount", amount)
        .ok()
        .and_then(|amount| statement.amount_paid.checked_add(amount))
        .and_then(|paid| ensure_storable("amount paid", paid).ok())
        .ok_or_else(|| {
            BillingError::InvalidPayment(format!(
                "payment of {amount} exceeds the storable amount paid"
            ))
        })?;

    statement.amount_paid = paid;
    mark_paid_if_covered(statement, now);
    Ok(())
}

/// Marks the statement paid when nothing is outstanding.
pub fn mark_paid_if_covered(statement: &mut StatementRecord, now: DateTime<Utc>) {
    if statement.amount_paid >= statement.total_due && statement.status != StatementStatus::Paid {
        statement.status = StatementStatus::Paid;
        statement.paid_at = Some(now);
    }
}
