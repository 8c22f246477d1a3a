//! Database enums and their mapping to core billing types.

use leasehold_core::billing::{self, ChargeCategory as CoreChargeCategory};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lease status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum LeaseStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "terminated")]
    Terminated,
}

/// Utility column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum UtilityKind {
    #[sea_orm(string_value = "water")]
    Water,
    #[sea_orm(string_value = "electricity")]
    Electricity,
}

/// Stored statement status. `overdue` is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Charge category column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ChargeCategory {
    #[sea_orm(string_value = "additional")]
    Additional,
    #[sea_orm(string_value = "discount")]
    Discount,
}

impl From<LeaseStatus> for billing::LeaseStatus {
    fn from(status: LeaseStatus) -> Self {
        match status {
            LeaseStatus::Pending => Self::Pending,
            LeaseStatus::Active => Self::Active,
            LeaseStatus::Completed => Self::Completed,
            LeaseStatus::Terminated => Self::Terminated,
        }
    }
}

impl From<billing::LeaseStatus> for LeaseStatus {
    fn from(status: billing::LeaseStatus) -> Self {
        match status {
            billing::LeaseStatus::Pending => Self::Pending,
            billing::LeaseStatus::Active => Self::Active,
            billing::LeaseStatus::Completed => Self::Completed,
            billing::LeaseStatus::Terminated => Self::Terminated,
        }
    }
}

impl From<UtilityKind> for billing::UtilityType {
    fn from(kind: UtilityKind) -> Self {
        match kind {
            UtilityKind::Water => Self::Water,
            UtilityKind::Electricity => Self::Electricity,
        }
    }
}

impl From<billing::UtilityType> for UtilityKind {
    fn from(utility: billing::UtilityType) -> Self {
        match utility {
            billing::UtilityType::Water => Self::Water,
            billing::UtilityType::Electricity => Self::Electricity,
        }
    }
}

impl From<BillingStatus> for billing::StatementStatus {
    fn from(status: BillingStatus) -> Self {
        match status {
            BillingStatus::Unpaid => Self::Unpaid,
            BillingStatus::Paid => Self::Paid,
        }
    }
}

impl From<billing::StatementStatus> for BillingStatus {
    fn from(status: billing::StatementStatus) -> Self {
        match status {
            billing::StatementStatus::Paid => Self::Paid,
            billing::StatementStatus::Unpaid | billing::StatementStatus::Overdue => Self::Unpaid,
        }
    }
}

impl From<ChargeCategory> for CoreChargeCategory {
    fn from(category: ChargeCategory) -> Self {
        match category {
            ChargeCategory::Additional => Self::Additional,
            ChargeCategory::Discount => Self::Discount,
        }
    }
}

impl From<CoreChargeCategory> for ChargeCategory {
    fn from(category: CoreChargeCategory) -> Self {
        match category {
            CoreChargeCategory::Additional => Self::Additional,
            CoreChargeCategory::Discount => Self::Discount,
        }
    }
}
