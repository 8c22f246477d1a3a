//! Database seeder for Leasehold development and testing.
//!
//! Seeds one property with two units, an active lease on the first unit, and
//! water and electricity rates for the current and previous month.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Datelike, Months, NaiveDate, Utc};
use leasehold_core::billing::{BillingPeriod, LeaseStatus, UtilityType};
use leasehold_db::{CreateLeaseInput, TenancyRepository, UtilityRateRepository};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = leasehold_db::connect(&database_url).await?;
    let tenancy = TenancyRepository::new(db.clone());
    let rates = UtilityRateRepository::new(db);

    println!("Seeding property and units...");
    let property_id = tenancy.create_property("Harbor View Residences").await?;
    let leased_unit = tenancy.create_unit(property_id, "Unit 1A").await?;
    let vacant_unit = tenancy.create_unit(property_id, "Unit 1B").await?;
    println!("  Property: {property_id}");
    println!("  Unit 1A (leased): {leased_unit}");
    println!("  Unit 1B (vacant): {vacant_unit}");

    let this_month = BillingPeriod::containing(Utc::now().date_naive());
    let last_month = this_month
        .start()
        .checked_sub_months(Months::new(1))
        .context("date out of range")?;

    println!("Seeding lease...");
    let lease = tenancy
        .create_lease(CreateLeaseInput {
            unit_id: leased_unit,
            status: LeaseStatus::Active,
            start_date: mid_month(last_month)?,
            end_date: None,
            monthly_rent: Decimal::new(12_000, 0),
            advance_balance: Decimal::new(12_000, 0),
            deposit_balance: Decimal::new(24_000, 0),
        })
        .await?;
    println!("  Lease: {}", lease.id);

    println!("Seeding utility rates...");
    for period in [last_month, this_month.start()] {
        rates
            .set_rate(property_id, UtilityType::Water, period, Decimal::new(2_250, 2))
            .await?;
        rates
            .set_rate(
                property_id,
                UtilityType::Electricity,
                period,
                Decimal::new(1_175, 2),
            )
            .await?;
        println!("  Rates for {}", BillingPeriod::containing(period));
    }

    println!("Seeding complete!");
    Ok(())
}

/// The 15th of the month starting at `start`, so the first statement is prorated.
fn mid_month(start: NaiveDate) -> anyhow::Result<NaiveDate> {
    start.with_day(15).context("date out of range")
}
