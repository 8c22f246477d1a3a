//! Properties, units, and leases.
//!
//! Billing only reads these; this repository exists for seeding and
//! administration.

use chrono::{NaiveDate, Utc};
use leasehold_core::billing::{LeaseRecord, LeaseStatus};
use leasehold_shared::types::{LeaseId, PropertyId, UnitId};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait};

use super::convert::lease_record;
use crate::entities::{leases, properties, sea_orm_active_enums, units};

/// Input for creating a lease.
#[derive(Debug, Clone)]
pub struct CreateLeaseInput {
    /// Leased unit.
    pub unit_id: UnitId,
    /// Lifecycle status.
    pub status: LeaseStatus,
    /// Move-in date.
    pub start_date: NaiveDate,
    /// Move-out date.
    pub end_date: Option<NaiveDate>,
    /// Monthly rent.
    pub monthly_rent: Decimal,
    /// Advance payment credit.
    pub advance_balance: Decimal,
    /// Security deposit.
    pub deposit_balance: Decimal,
}

/// Tenancy repository.
#[derive(Debug, Clone)]
pub struct TenancyRepository {
    db: DatabaseConnection,
}

impl TenancyRepository {
    /// Creates a new tenancy repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a property.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_property(&self, name: &str) -> Result<PropertyId, DbErr> {
        let id = PropertyId::new();
        properties::ActiveModel {
            id: Set(id.into_inner()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(&self.db)
        .await?;
        Ok(id)
    }

    /// Creates a unit within a property.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_unit(&self, property_id: PropertyId, name: &str) -> Result<UnitId, DbErr> {
        let id = UnitId::new();
        units::ActiveModel {
            id: Set(id.into_inner()),
            property_id: Set(property_id.into_inner()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(&self.db)
        .await?;
        Ok(id)
    }

    /// Creates a lease.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_lease(&self, input: CreateLeaseInput) -> Result<LeaseRecord, DbErr> {
        let now = Utc::now().fixed_offset();
        let model = leases::ActiveModel {
            id: Set(LeaseId::new().into_inner()),
            unit_id: Set(input.unit_id.into_inner()),
            status: Set(sea_orm_active_enums::LeaseStatus::from(input.status)),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            monthly_rent: Set(input.monthly_rent),
            advance_balance: Set(input.advance_balance),
            deposit_balance: Set(input.deposit_balance),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(lease_record(model))
    }

    /// Finds a lease by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_lease(&self, id: LeaseId) -> Result<Option<LeaseRecord>, DbErr> {
        Ok(leases::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .map(lease_record))
    }
}
