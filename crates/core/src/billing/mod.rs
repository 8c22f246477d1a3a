//! Unit billing.
//!
//! - Meter usage calculation per utility (`usage`)
//! - Statement assembly with idempotent monthly upsert (`service`)
//! - First-month proration (`proration`)
//! - Payment confirmation and settlement from lease credits (`payment`, `settlement`)

pub mod amount;
pub mod charge;
pub mod error;
pub mod id;
pub mod input;
pub mod payment;
pub mod period;
pub mod proration;
pub mod service;
pub mod settlement;
pub mod statement;
pub mod store;
pub mod types;
pub mod usage;


pub use amount::{MAX_STORED, STORED_SCALE, ensure_storable};
pub use charge::{Charge, ChargeCategory, ParsedCharges, RawCharge, SkippedCharge, parse_charges};
pub use error::BillingError;
pub use id::{BillingIdGenerator, RandomBillingIdGenerator};
pub use input::{BillingRequest, parse_unit_id};
pub use payment::{apply_payment, mark_paid_if_covered};
pub use period::BillingPeriod;
pub use proration::prorated_rent;
pub use service::BillingService;
pub use settlement::{SettlementPlan, plan_settlement};
pub use statement::compute_total;
pub use store::{BillingStore, BillingTx};
pub use types::{
    LeaseRecord, LeaseStatus, MeterReadingRecord, ReadingPair, SaveBillingInput,
    SaveBillingResult, SaveOutcome, StatementDetail, StatementRecord, StatementStatus,
    StatementSummary, UtilityLine, UtilityRateRecord, UtilityType,
};
pub use usage::{UsageCost, compute_usage_cost};
