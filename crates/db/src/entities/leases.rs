//! `SeaORM` Entity for leases table.

use super::sea_orm_active_enums::LeaseStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "leases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub unit_id: Uuid,
    pub status: LeaseStatus,
    pub start_date: Date,
    pub end_date: Option<Date>,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub monthly_rent: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub advance_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub deposit_balance: Decimal,
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
    #[sea_orm(has_many = "super::billing_statements::Entity")]
    BillingStatements,
}

impl Related<super::units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Units.def()
    }
}

impl Related<super::billing_statements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillingStatements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
