//! Billing data types.

use chrono::{DateTime, NaiveDate, Utc};
use leasehold_shared::types::{LeaseId, PropertyId, UnitId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::charge::{Charge, SkippedCharge};
use super::usage::UsageCost;

/// Metered utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilityType {
    /// Water, billed per cubic meter.
    Water,
    /// Electricity, billed per kWh.
    Electricity,
}

impl UtilityType {
    /// All metered utilities, in statement order.
    pub const ALL: [Self; 2] = [Self::Water, Self::Electricity];

    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Electricity => "electricity",
        }
    }
}

impl std::fmt::Display for UtilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status of a statement.
///
/// Only `Unpaid` and `Paid` are stored. `Overdue` is derived at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementStatus {
    /// Awaiting payment.
    Unpaid,
    /// Fully paid.
    Paid,
    /// Unpaid past its due date.
    Overdue,
}

impl StatementStatus {
    /// Returns the status a reader sees on `today`.
    #[must_use]
    pub fn effective(self, due_date: NaiveDate, today: NaiveDate) -> Self {
        match self {
            Self::Paid => Self::Paid,
            Self::Unpaid | Self::Overdue if due_date < today => Self::Overdue,
            Self::Unpaid | Self::Overdue => Self::Unpaid,
        }
    }
}

/// Whether a save created a statement or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    /// A new statement row was written.
    Created,
    /// An existing statement for the same unit and month was updated.
    Updated,
}

/// Lease lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaseStatus {
    /// Signed but not yet started.
    Pending,
    /// Tenant in occupancy.
    Active,
    /// Term finished, still billable for the final period.
    Completed,
    /// Ended early.
    Terminated,
}

impl LeaseStatus {
    /// Whether statements may be issued against a lease in this status.
    #[must_use]
    pub const fn is_billable(self) -> bool {
        matches!(self, Self::Active | Self::Completed)
    }
}

/// A lease as the assembler needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseRecord {
    /// Lease ID.
    pub id: LeaseId,
    /// Leased unit.
    pub unit_id: UnitId,
    /// Lifecycle status.
    pub status: LeaseStatus,
    /// Move-in date.
    pub start_date: NaiveDate,
    /// Move-out date, if known.
    pub end_date: Option<NaiveDate>,
    /// Monthly rent.
    pub monthly_rent: Decimal,
    /// Remaining advance payment credit.
    pub advance_balance: Decimal,
    /// Remaining security deposit.
    pub deposit_balance: Decimal,
}

/// A persisted billing statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementRecord {
    /// Opaque statement id, e.g. `BILL-7QK2M9XA`.
    pub id: String,
    /// Billed unit.
    pub unit_id: UnitId,
    /// Lease the statement was issued against.
    pub lease_id: LeaseId,
    /// First day of the billed calendar month.
    pub period_start: NaiveDate,
    /// Reading date submitted with the latest save.
    pub billing_date: NaiveDate,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// Base rent after proration.
    pub base_rent: Decimal,
    /// Water cost component.
    pub water_cost: Decimal,
    /// Electricity cost component.
    pub electricity_cost: Decimal,
    /// Total amount due as supplied by the caller.
    pub total_due: Decimal,
    /// Total derived from the components.
    pub computed_total: Decimal,
    /// Amount paid so far.
    pub amount_paid: Decimal,
    /// Stored status (`unpaid` or `paid`).
    pub status: StatementStatus,
    /// When the statement became fully paid.
    pub paid_at: Option<DateTime<Utc>>,
}

impl StatementRecord {
    /// Amount still owed, never negative.
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        (self.total_due - self.amount_paid).max(Decimal::ZERO)
    }
}

/// A meter reading row for one unit, utility and reading date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterReadingRecord {
    /// Metered unit.
    pub unit_id: UnitId,
    /// Utility.
    pub utility: UtilityType,
    /// Date the meter was read.
    pub reading_date: NaiveDate,
    /// Previous meter value.
    pub previous_reading: Decimal,
    /// Current meter value.
    pub current_reading: Decimal,
    /// Consumption, clamped at zero.
    pub usage: Decimal,
    /// Rate applied, if one was configured.
    pub rate: Option<Decimal>,
    /// Cost of the consumption.
    pub cost: Decimal,
}

/// A price per unit of consumption for one property, utility and month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityRateRecord {
    /// Property the rate applies to.
    pub property_id: PropertyId,
    /// Utility.
    pub utility: UtilityType,
    /// First day of the month the rate applies to.
    pub period_start: NaiveDate,
    /// Price per unit of consumption.
    pub rate: Decimal,
}

/// A pair of meter values submitted for one utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingPair {
    /// Previous meter value.
    pub previous: Decimal,
    /// Current meter value.
    pub current: Decimal,
}

/// Validated input of a save.
#[derive(Debug, Clone)]
pub struct SaveBillingInput {
    /// Billed unit.
    pub unit_id: UnitId,
    /// Reading date; its calendar month is the billing period.
    pub reading_date: NaiveDate,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// Water readings, when both values were submitted.
    pub water: Option<ReadingPair>,
    /// Electricity readings, when both values were submitted.
    pub electricity: Option<ReadingPair>,
    /// Caller aggregate for water, used when no cost can be computed.
    pub total_water_amount: Option<Decimal>,
    /// Caller aggregate for electricity, used when no cost can be computed.
    pub total_electricity_amount: Option<Decimal>,
    /// Caller total; persisted as the statement total.
    pub total_amount_due: Decimal,
    /// Additional charges and discounts, in submitted order.
    pub additional_charges: Vec<super::charge::RawCharge>,
}

impl SaveBillingInput {
    /// Readings submitted for `utility`.
    #[must_use]
    pub const fn readings(&self, utility: UtilityType) -> Option<ReadingPair> {
        match utility {
            UtilityType::Water => self.water,
            UtilityType::Electricity => self.electricity,
        }
    }

    /// Caller aggregate submitted for `utility`.
    #[must_use]
    pub const fn supplied_amount(&self, utility: UtilityType) -> Option<Decimal> {
        match utility {
            UtilityType::Water => self.total_water_amount,
            UtilityType::Electricity => self.total_electricity_amount,
        }
    }
}

/// Per-utility breakdown returned by a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityLine {
    /// Computed usage and cost, when readings were submitted.
    pub reading: Option<UsageCost>,
    /// Rate found for the period.
    pub rate: Option<Decimal>,
    /// Cost component that went into the statement.
    pub cost: Decimal,
}

/// Result of `save_or_update_billing`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBillingResult {
    /// Statement id.
    pub billing_id: String,
    /// Created or updated.
    pub status: SaveOutcome,
    /// Stored payment status after the save.
    pub billing_status: StatementStatus,
    /// Persisted total.
    pub total_due: Decimal,
    /// Total derived from the components.
    pub computed_total: Decimal,
    /// Whether the persisted total disagrees with the computed total.
    pub total_mismatch: bool,
    /// Water breakdown.
    pub water: UtilityLine,
    /// Electricity breakdown.
    pub electricity: UtilityLine,
    /// Charge rows that were dropped.
    pub skipped_charges: Vec<SkippedCharge>,
}

/// Full view of one statement.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementDetail {
    /// The statement.
    #[serde(flatten)]
    pub statement: StatementRecord,
    /// Status as of today, with overdue derived.
    pub effective_status: StatementStatus,
    /// Charges in submitted order.
    pub charges: Vec<Charge>,
    /// Meter readings of the statement's period.
    pub readings: Vec<MeterReadingRecord>,
}

/// A statement in a list, with its status as of today.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementSummary {
    /// The statement.
    #[serde(flatten)]
    pub statement: StatementRecord,
    /// Status as of today, with overdue derived.
    pub effective_status: StatementStatus,
}

impl StatementSummary {
    /// Wraps `statement` with its status on `today`.
    #[must_use]
    pub fn as_of(statement: StatementRecord, today: NaiveDate) -> Self {
        let effective_status = statement.status.effective(statement.due_date, today);
        Self {
            statement,
            effective_status,
        }
    }
}
