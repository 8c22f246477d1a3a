//! Utility rate repository.

use chrono::{NaiveDate, Utc};
use leasehold_core::billing::{
    BillingPeriod, MAX_STORED, UtilityRateRecord, UtilityType, ensure_storable,
};
use leasehold_shared::AppError;
use leasehold_shared::types::PropertyId;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::info;
use uuid::Uuid;

use super::convert::rate_record;
use crate::entities::{properties, sea_orm_active_enums::UtilityKind, utility_rates};

/// Error types for utility rate operations.
#[derive(Debug, thiserror::Error)]
pub enum UtilityRateError {
    /// Rate must not be negative.
    #[error("Utility rate must not be negative")]
    NegativeRate,

    /// Rate is too large or too precise to store.
    #[error("Utility rate {0} must be within {max} with at most 4 decimal places", max = MAX_STORED)]
    UnstorableRate(Decimal),

    /// Property not found.
    #[error("Property not found: {0}")]
    PropertyNotFound(PropertyId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UtilityRateError> for AppError {
    fn from(err: UtilityRateError) -> Self {
        match err {
            UtilityRateError::NegativeRate | UtilityRateError::UnstorableRate(_) => {
                Self::Validation(err.to_string())
            }
            UtilityRateError::PropertyNotFound(_) => Self::NotFound(err.to_string()),
            UtilityRateError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Utility rate repository.
#[derive(Debug, Clone)]
pub struct UtilityRateRepository {
    db: DatabaseConnection,
}

impl UtilityRateRepository {
    /// Creates a new utility rate repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sets the rate of a property for a utility and the month containing
    /// `period` (upsert).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Rate is negative, or too large or precise to store
    /// - Property does not exist
    pub async fn set_rate(
        &self,
        property_id: PropertyId,
        utility: UtilityType,
        period: NaiveDate,
        rate: Decimal,
    ) -> Result<UtilityRateRecord, UtilityRateError> {
        if rate < Decimal::ZERO {
            return Err(UtilityRateError::NegativeRate);
        }
        ensure_storable("rate", rate).map_err(|_| UtilityRateError::UnstorableRate(rate))?;

        let property = properties::Entity::find_by_id(property_id.into_inner())
            .one(&self.db)
            .await?;
        if property.is_none() {
            return Err(UtilityRateError::PropertyNotFound(property_id));
        }

        let period_start = BillingPeriod::containing(period).start();
        let now = Utc::now().fixed_offset();
        let model = utility_rates::ActiveModel {
            id: Set(Uuid::now_v7()),
            property_id: Set(property_id.into_inner()),
            utility: Set(UtilityKind::from(utility)),
            period_start: Set(period_start),
            rate: Set(rate),
            created_at: Set(now),
            updated_at: Set(now),
        };

        utility_rates::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    utility_rates::Column::PropertyId,
                    utility_rates::Column::Utility,
                    utility_rates::Column::PeriodStart,
                ])
                .update_columns([utility_rates::Column::Rate, utility_rates::Column::UpdatedAt])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        info!(
            property_id = %property_id,
            utility = %utility,
            period_start = %period_start,
            rate = %rate,
            "Utility rate set"
        );

        Ok(UtilityRateRecord {
            property_id,
            utility,
            period_start,
            rate,
        })
    }

    /// Lists a property's rates, newest month first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_rates(
        &self,
        property_id: PropertyId,
    ) -> Result<Vec<UtilityRateRecord>, UtilityRateError> {
        let rates = utility_rates::Entity::find()
            .filter(utility_rates::Column::PropertyId.eq(property_id.into_inner()))
            .order_by_desc(utility_rates::Column::PeriodStart)
            .order_by_asc(utility_rates::Column::Utility)
            .all(&self.db)
            .await?;

        Ok(rates.into_iter().map(rate_record).collect())
    }
}
