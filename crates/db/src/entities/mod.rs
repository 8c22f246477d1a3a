//! `SeaORM` entity definitions.

pub mod prelude;

pub mod billing_charges;
pub mod billing_statements;
pub mod leases;
pub mod meter_readings;
pub mod properties;
pub mod sea_orm_active_enums;
pub mod units;
pub mod utility_rates;
