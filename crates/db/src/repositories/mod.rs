//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod billing_store;
pub mod statement;
pub mod tenancy;
pub mod utility_rate;

mod convert;

pub use billing_store::{SeaBillingStore, SeaBillingTx};
pub use statement::{SettlementResult, StatementError, StatementRepository};
pub use tenancy::{CreateLeaseInput, TenancyRepository};
pub use utility_rate::{UtilityRateError, UtilityRateRepository};
