//! `SeaORM` Entity for billing_charges table.

use super::sea_orm_active_enums::ChargeCategory;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "billing_charges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub billing_id: String,
    pub category: ChargeCategory,
    pub label: String,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub position: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::billing_statements::Entity",
        from = "Column::BillingId",
        to = "super::billing_statements::Column::Id",
        on_delete = "Cascade"
    )]
    BillingStatements,
}

impl Related<super::billing_statements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillingStatements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
