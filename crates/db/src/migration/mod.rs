//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and written with the schema
//! builder, so the same migrations run on PostgreSQL and on the in-memory
//! SQLite databases used by tests.

pub use sea_orm_migration::prelude::*;

mod m20261001_000001_tenancy;
mod m20261001_000002_billing;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_tenancy::Migration),
            Box::new(m20261001_000002_billing::Migration),
        ]
    }
}
