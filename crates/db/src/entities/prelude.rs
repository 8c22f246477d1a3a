//! Entity re-exports.

pub use super::billing_charges::Entity as BillingCharges;
pub use super::billing_statements::Entity as BillingStatements;
pub use super::leases::Entity as Leases;
pub use super::meter_readings::Entity as MeterReadings;
pub use super::properties::Entity as Properties;
pub use super::units::Entity as Units;
pub use super::utility_rates::Entity as UtilityRates;
