//! Conversions between entity models and core billing records.

use chrono::Utc;
use leasehold_core::billing::{
    BillingError, Charge, LeaseRecord, MeterReadingRecord, StatementRecord, UtilityRateRecord,
};
use leasehold_shared::types::{LeaseId, PropertyId, UnitId};
use sea_orm::DbErr;

use crate::entities::{billing_charges, billing_statements, leases, meter_readings, utility_rates};

/// Wraps a driver error; the message is kept for diagnostics.
pub(crate) fn persistence(err: DbErr) -> BillingError {
    BillingError::Persistence(err.to_string())
}

pub(crate) fn lease_record(model: leases::Model) -> LeaseRecord {
    LeaseRecord {
        id: LeaseId::from_uuid(model.id),
        unit_id: UnitId::from_uuid(model.unit_id),
        status: model.status.into(),
        start_date: model.start_date,
        end_date: model.end_date,
        monthly_rent: model.monthly_rent,
        advance_balance: model.advance_balance,
        deposit_balance: model.deposit_balance,
    }
}

pub(crate) fn statement_record(model: billing_statements::Model) -> StatementRecord {
    StatementRecord {
        id: model.id,
        unit_id: UnitId::from_uuid(model.unit_id),
        lease_id: LeaseId::from_uuid(model.lease_id),
        period_start: model.period_start,
        billing_date: model.billing_date,
        due_date: model.due_date,
        base_rent: model.base_rent,
        water_cost: model.water_cost,
        electricity_cost: model.electricity_cost,
        total_due: model.total_due,
        computed_total: model.computed_total,
        amount_paid: model.amount_paid,
        status: model.status.into(),
        paid_at: model.paid_at.map(|at| at.with_timezone(&Utc)),
    }
}

pub(crate) fn reading_record(model: meter_readings::Model) -> MeterReadingRecord {
    MeterReadingRecord {
        unit_id: UnitId::from_uuid(model.unit_id),
        utility: model.utility.into(),
        reading_date: model.reading_date,
        previous_reading: model.previous_reading,
        current_reading: model.current_reading,
        usage: model.usage,
        rate: model.rate,
        cost: model.cost,
    }
}

pub(crate) fn charge(model: billing_charges::Model) -> Charge {
    Charge::new(model.category.into(), model.label, model.amount)
}

pub(crate) fn rate_record(model: utility_rates::Model) -> UtilityRateRecord {
    UtilityRateRecord {
        property_id: PropertyId::from_uuid(model.property_id),
        utility: model.utility.into(),
        period_start: model.period_start,
        rate: model.rate,
    }
}
