//! Settlement from lease credits.
//!
//! Credits are applied to the outstanding balance in a fixed order:
//! 1. the advance payment balance;
//! 2. the security deposit, only on move-out (`use_deposit`).

use rust_decimal::Decimal;
use serde::Serialize;

/// How a settlement splits across the lease's credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementPlan {
    /// Taken from the advance payment balance.
    pub from_advance: Decimal,
    /// Taken from the security deposit.
    pub from_deposit: Decimal,
    /// Still owed afterwards.
    pub remaining: Decimal,
}

impl SettlementPlan {
    /// Total credit applied.
    #[must_use]
    pub fn applied(&self) -> Decimal {
        self.from_advance + self.from_deposit
    }

    /// Whether the outstanding balance is fully covered.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.remaining.is_zero()
    }
}

/// Plans how `outstanding` is covered by the lease's credits.
///
/// Negative balances are treated as zero.
#[must_use]
pub fn plan_settlement(
    outstanding: Decimal,
    advance_balance: Decimal,
    deposit_balance: Decimal,
    use_deposit: bool,
) -> SettlementPlan {
    let outstanding = outstanding.max(Decimal::ZERO);

    let from_advance = outstanding.min(advance_balance.max(Decimal::ZERO));
    let after_advance = outstanding - from_advance;

    let from_deposit = if use_deposit {
        after_advance.min(deposit_balance.max(Decimal::ZERO))
    } else {
        Decimal::ZERO
    };

    SettlementPlan {
        from_advance,
        from_deposit,
        remaining: after_advance - from_deposit,
    }
}
