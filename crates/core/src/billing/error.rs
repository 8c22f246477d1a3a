//! Billing error types.

use leasehold_shared::{AppError, types::UnitId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Billing-related errors.
///
/// Every variant aborts the surrounding transaction.
#[derive(Debug, Error)]
pub enum BillingError {
    /// A required field is missing or malformed, or an amount is negative or
    /// outside the storable range.
    #[error("Invalid billing input: {0}")]
    Validation(String),

    /// The unit has no active or completed lease.
    #[error("No active or completed lease for unit {0}")]
    NoActiveLease(UnitId),

    /// Statement not found.
    #[error("Billing statement not found: {0}")]
    NotFound(String),

    /// Storage failure.
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// The candidate statement id is already taken.
    ///
    /// Resolved by regeneration inside the assembler and never returned to callers.
    #[error("Billing id already exists: {0}")]
    DuplicateIdentifier(String),

    /// Caller total disagrees with the computed total.
    #[error("Total amount due {supplied} does not match computed total {computed}")]
    TotalMismatch {
        /// Total supplied by the caller.
        supplied: Decimal,
        /// Total derived from the components.
        computed: Decimal,
    },

    /// An additional charge row could not be parsed.
    #[error("Malformed additional charge: {0}")]
    MalformedCharge(String),

    /// Payment amount is not positive.
    #[error("Invalid payment: {0}")]
    InvalidPayment(String),
}

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::Validation(_)
            | BillingError::MalformedCharge(_)
            | BillingError::InvalidPayment(_) => Self::Validation(err.to_string()),
            BillingError::NoActiveLease(_) | BillingError::NotFound(_) => {
                Self::NotFound(err.to_string())
            }
            BillingError::TotalMismatch { .. } => Self::BusinessRule(err.to_string()),
            BillingError::Persistence(msg) => Self::Database(msg),
            BillingError::DuplicateIdentifier(_) => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(BillingError::Validation("dueDate is required".into()), 400)]
    #[case(BillingError::MalformedCharge("row 0".into()), 400)]
    #[case(BillingError::InvalidPayment("amount must be positive".into()), 400)]
    #[case(BillingError::NoActiveLease(UnitId::new()), 404)]
    #[case(BillingError::NotFound("BILL-1".into()), 404)]
    #[case(BillingError::TotalMismatch { supplied: dec!(10), computed: dec!(12) }, 422)]
    #[case(BillingError::Persistence("connection reset".into()), 500)]
    fn test_maps_to_http_status(#[case] err: BillingError, #[case] status: u16) {
        assert_eq!(AppError::from(err).status_code(), status);
    }

    #[test]
    fn test_persistence_keeps_driver_message() {
        let app: AppError = BillingError::Persistence("deadlock detected".into()).into();
        assert_eq!(app.to_string(), "Database error: deadlock detected");
    }
}
