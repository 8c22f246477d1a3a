//! Persistence seams of the assembler.
//!
//! These traits are implemented by the db crate. One [`BillingTx`] spans one
//! save; nothing it wrote is visible to other transactions before
//! [`BillingTx::commit`].

use std::future::Future;

use chrono::NaiveDate;
use leasehold_shared::types::UnitId;
use rust_decimal::Decimal;

use super::charge::Charge;
use super::error::BillingError;
use super::types::{LeaseRecord, MeterReadingRecord, StatementRecord, UtilityType};

/// Opens billing transactions.
pub trait BillingStore: Send + Sync {
    /// Transaction type.
    type Tx: BillingTx;

    /// Begins a transaction.
    fn begin(&self) -> impl Future<Output = Result<Self::Tx, BillingError>> + Send;
}

/// Operations of one billing transaction.
pub trait BillingTx: Send + Sync {
    /// The lease to bill for a unit: active or completed, preferring active,
    /// then the latest start date.
    fn find_lease_for_unit(
        &self,
        unit_id: UnitId,
    ) -> impl Future<Output = Result<Option<LeaseRecord>, BillingError>> + Send;

    /// Rate of the unit's property for a utility and month.
    fn find_rate(
        &self,
        unit_id: UnitId,
        utility: UtilityType,
        period_start: NaiveDate,
    ) -> impl Future<Output = Result<Option<Decimal>, BillingError>> + Send;

    /// The statement of a unit for a month.
    fn find_statement(
        &self,
        unit_id: UnitId,
        period_start: NaiveDate,
    ) -> impl Future<Output = Result<Option<StatementRecord>, BillingError>> + Send;

    /// Inserts a new statement, doing nothing on conflict.
    ///
    /// Returns `DuplicateIdentifier` when no row was written, whether the id
    /// or the (unit, month) pair conflicted.
    fn insert_statement(
        &self,
        statement: &StatementRecord,
    ) -> impl Future<Output = Result<(), BillingError>> + Send;

    /// Overwrites an existing statement by id.
    ///
    /// `amount_paid` is left as stored; only payment paths change it.
    fn update_statement(
        &self,
        statement: &StatementRecord,
    ) -> impl Future<Output = Result<(), BillingError>> + Send;

    /// Inserts or updates the reading keyed by (unit, utility, reading date).
    fn upsert_meter_reading(
        &self,
        reading: &MeterReadingRecord,
    ) -> impl Future<Output = Result<(), BillingError>> + Send;

    /// Deletes every charge of the statement and inserts `charges` in order.
    fn replace_charges(
        &self,
        billing_id: &str,
        charges: &[Charge],
    ) -> impl Future<Output = Result<(), BillingError>> + Send;

    /// Commits.
    fn commit(self) -> impl Future<Output = Result<(), BillingError>> + Send;

    /// Rolls back.
    fn rollback(self) -> impl Future<Output = Result<(), BillingError>> + Send;
}
