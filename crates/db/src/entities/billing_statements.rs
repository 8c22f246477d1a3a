//! `SeaORM` Entity for billing_statements table.

use super::sea_orm_active_enums::BillingStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "billing_statements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub unit_id: Uuid,
    pub lease_id: Uuid,
    pub period_start: Date,
    pub billing_date: Date,
    pub due_date: Date,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub base_rent: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub water_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub electricity_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub total_due: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub computed_total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount_paid: Decimal,
    pub status: BillingStatus,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::units::Entity",
        from = "Column::UnitId",
        to = "super::units::Column::Id",
        on_delete = "Cascade"
    )]
    Units,
    #[sea_orm(
        belongs_to = "super::leases::Entity",
        from = "Column::LeaseId",
        to = "super::leases::Column::Id"
    )]
    Leases,
    #[sea_orm(has_many = "super::billing_charges::Entity")]
    BillingCharges,
}

impl Related<super::units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Units.def()
    }
}

impl Related<super::leases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leases.def()
    }
}

impl Related<super::billing_charges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillingCharges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
