//! Shared fixtures for database integration tests.
//!
//! Every test gets its own in-memory SQLite database with migrations applied.
//! The pool holds exactly one connection so the database lives as long as it.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use leasehold_core::billing::{
    BillingIdGenerator, BillingRequest, BillingService, LeaseRecord, LeaseStatus,
    RandomBillingIdGenerator, SaveBillingInput,
};
use leasehold_db::migration::{Migrator, MigratorTrait};
use leasehold_db::{CreateLeaseInput, SeaBillingStore, TenancyRepository, UtilityRateRepository};
use leasehold_shared::BillingConfig;
use leasehold_shared::types::{PropertyId, UnitId};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;

pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A property with one unit.
pub struct Fixture {
    pub property_id: PropertyId,
    pub unit_id: UnitId,
}

pub async fn create_unit(db: &DatabaseConnection) -> Fixture {
    let tenancy = TenancyRepository::new(db.clone());
    let property_id = tenancy
        .create_property("Harbor View")
        .await
        .expect("Failed to create property");
    let unit_id = tenancy
        .create_unit(property_id, "Unit 4B")
        .await
        .expect("Failed to create unit");

    Fixture {
        property_id,
        unit_id,
    }
}

pub async fn create_lease(
    db: &DatabaseConnection,
    unit_id: UnitId,
    status: LeaseStatus,
    start_date: NaiveDate,
    monthly_rent: Decimal,
) -> LeaseRecord {
    TenancyRepository::new(db.clone())
        .create_lease(CreateLeaseInput {
            unit_id,
            status,
            start_date,
            end_date: None,
            monthly_rent,
            advance_balance: Decimal::ZERO,
            deposit_balance: Decimal::ZERO,
        })
        .await
        .expect("Failed to create lease")
}

pub async fn set_rate(
    db: &DatabaseConnection,
    property_id: PropertyId,
    utility: leasehold_core::billing::UtilityType,
    period: NaiveDate,
    rate: Decimal,
) {
    UtilityRateRepository::new(db.clone())
        .set_rate(property_id, utility, period, rate)
        .await
        .expect("Failed to set rate");
}

pub fn billing_service(
    db: &DatabaseConnection,
    config: BillingConfig,
) -> BillingService<SeaBillingStore, RandomBillingIdGenerator> {
    BillingService::new(
        Arc::new(SeaBillingStore::new(db.clone())),
        RandomBillingIdGenerator::new(config.id_prefix.clone()),
        config,
    )
}

pub fn request(unit_id: UnitId, body: Value) -> SaveBillingInput {
    serde_json::from_value::<BillingRequest>(body)
        .expect("Invalid request body")
        .into_input(unit_id)
        .expect("Invalid billing input")
}

/// Hands out a fixed sequence of ids, then repeats the last one.
pub struct SequenceIds {
    ids: Vec<&'static str>,
    next: AtomicUsize,
}

impl SequenceIds {
    pub fn new(ids: Vec<&'static str>) -> Self {
        Self {
            ids,
            next: AtomicUsize::new(0),
        }
    }
}

impl BillingIdGenerator for SequenceIds {
    fn generate(&self) -> String {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        self.ids[i.min(self.ids.len() - 1)].to_string()
    }
}
