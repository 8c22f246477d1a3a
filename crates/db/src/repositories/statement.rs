//! Statement repository: read side, payment confirmation, and settlement.

use chrono::{NaiveDate, Utc};
use leasehold_core::billing::{
    self, BillingError, SettlementPlan, StatementDetail, StatementRecord, StatementSummary,
};
use leasehold_shared::AppError;
use leasehold_shared::types::{PageRequest, PageResponse, UnitId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use serde::Serialize;
use tracing::info;

use super::convert::{charge, lease_record, reading_record, statement_record};
use crate::entities::{
    billing_charges, billing_statements, leases, meter_readings,
    sea_orm_active_enums::BillingStatus,
};

/// Error types for statement operations.
#[derive(Debug, thiserror::Error)]
pub enum StatementError {
    /// Statement not found.
    #[error("Billing statement not found: {0}")]
    NotFound(String),

    /// Lease referenced by the statement is missing.
    #[error("Lease of billing statement {0} not found")]
    LeaseNotFound(String),

    /// Billing rule violation.
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<StatementError> for AppError {
    fn from(err: StatementError) -> Self {
        match err {
            StatementError::NotFound(_) | StatementError::LeaseNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            StatementError::Billing(e) => e.into(),
            StatementError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Outcome of settling a statement from lease credits.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResult {
    /// How the outstanding balance was covered.
    pub plan: SettlementPlan,
    /// Statement after settlement.
    pub statement: StatementRecord,
    /// Advance payment credit left on the lease.
    pub advance_balance: Decimal,
    /// Security deposit left on the lease.
    pub deposit_balance: Decimal,
}

/// Statement repository.
#[derive(Debug, Clone)]
pub struct StatementRepository {
    db: DatabaseConnection,
}

impl StatementRepository {
    /// Creates a new statement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a statement with its charges (in submitted order), the meter
    /// readings of its period, and its status as of `today`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the statement does not exist.
    pub async fn get_statement(
        &self,
        billing_id: &str,
        today: NaiveDate,
    ) -> Result<StatementDetail, StatementError> {
        let model = billing_statements::Entity::find_by_id(billing_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| StatementError::NotFound(billing_id.to_string()))?;
        let statement = statement_record(model);

        let charges = billing_charges::Entity::find()
            .filter(billing_charges::Column::BillingId.eq(billing_id))
            .order_by_asc(billing_charges::Column::Position)
            .all(&self.db)
            .await?
            .into_iter()
            .map(charge)
            .collect();

        let period = billing::BillingPeriod::containing(statement.period_start);
        let readings = meter_readings::Entity::find()
            .filter(meter_readings::Column::UnitId.eq(statement.unit_id.into_inner()))
            .filter(meter_readings::Column::ReadingDate.between(period.start(), period.end()))
            .order_by_asc(meter_readings::Column::Utility)
            .order_by_asc(meter_readings::Column::ReadingDate)
            .all(&self.db)
            .await?
            .into_iter()
            .map(reading_record)
            .collect();

        Ok(StatementDetail {
            effective_status: statement.status.effective(statement.due_date, today),
            statement,
            charges,
            readings,
        })
    }

    /// Lists a unit's statements, newest period first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_statements(
        &self,
        unit_id: UnitId,
        page: &PageRequest,
        today: NaiveDate,
    ) -> Result<PageResponse<StatementSummary>, StatementError> {
        let page = page.clamped();
        let query = billing_statements::Entity::find()
            .filter(billing_statements::Column::UnitId.eq(unit_id.into_inner()));

        let total = query.clone().count(&self.db).await?;
        let statements = query
            .order_by_desc(billing_statements::Column::PeriodStart)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| StatementSummary::as_of(statement_record(m), today))
            .collect();

        Ok(PageResponse::new(statements, page.page, page.per_page, total))
    }

    /// Lists statements not paid whose due date is before `today`, oldest due
    /// date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_overdue(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<StatementSummary>, StatementError> {
        let statements = billing_statements::Entity::find()
            .filter(billing_statements::Column::Status.ne(BillingStatus::Paid))
            .filter(billing_statements::Column::DueDate.lt(today))
            .order_by_asc(billing_statements::Column::DueDate)
            .all(&self.db)
            .await?;

        Ok(statements
            .into_iter()
            .map(|m| StatementSummary::as_of(statement_record(m), today))
            .collect())
    }

    /// Records a payment; the statement becomes `paid` once fully covered.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is not positive
    /// - The statement does not exist
    pub async fn confirm_payment(
        &self,
        billing_id: &str,
        amount: Decimal,
    ) -> Result<StatementRecord, StatementError> {
        let txn = self.db.begin().await?;

        let model = find_for_update(&txn, billing_id).await?;
        let mut statement = statement_record(model.clone());
        billing::apply_payment(&mut statement, amount, Utc::now())?;
        save_payment_state(&txn, model, &statement).await?;

        txn.commit().await?;

        info!(
            billing_id = %billing_id,
            amount = %amount,
            status = ?statement.status,
            "Payment confirmed"
        );
        Ok(statement)
    }

    /// Applies the lease's advance payment, then its security deposit when
    /// `use_deposit` is set, to the statement's outstanding balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement or its lease does not exist.
    pub async fn settle(
        &self,
        billing_id: &str,
        use_deposit: bool,
    ) -> Result<SettlementResult, StatementError> {
        let txn = self.db.begin().await?;

        let model = find_for_update(&txn, billing_id).await?;
        let mut statement = statement_record(model.clone());

        let lease_model = leases::Entity::find_by_id(statement.lease_id.into_inner())
            .one(&txn)
            .await?
            .ok_or_else(|| StatementError::LeaseNotFound(billing_id.to_string()))?;
        let lease = lease_record(lease_model.clone());

        let plan = billing::plan_settlement(
            statement.outstanding(),
            lease.advance_balance,
            lease.deposit_balance,
            use_deposit,
        );
        let advance_balance = lease.advance_balance - plan.from_advance;
        let deposit_balance = lease.deposit_balance - plan.from_deposit;

        if !plan.applied().is_zero() {
            let mut lease_active = lease_model.into_active_model();
            lease_active.advance_balance = Set(advance_balance);
            lease_active.deposit_balance = Set(deposit_balance);
            lease_active.updated_at = Set(Utc::now().fixed_offset());
            lease_active.update(&txn).await?;

            statement.amount_paid += plan.applied();
        }
        billing::mark_paid_if_covered(&mut statement, Utc::now());
        save_payment_state(&txn, model, &statement).await?;

        txn.commit().await?;

        info!(
            billing_id = %billing_id,
            from_advance = %plan.from_advance,
            from_deposit = %plan.from_deposit,
            remaining = %plan.remaining,
            "Statement settled from lease credits"
        );

        Ok(SettlementResult {
            plan,
            statement,
            advance_balance,
            deposit_balance,
        })
    }
}

async fn find_for_update(
    txn: &DatabaseTransaction,
    billing_id: &str,
) -> Result<billing_statements::Model, StatementError> {
    billing_statements::Entity::find_by_id(billing_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| StatementError::NotFound(billing_id.to_string()))
}

async fn save_payment_state(
    txn: &DatabaseTransaction,
    model: billing_statements::Model,
    statement: &StatementRecord,
) -> Result<(), StatementError> {
    let mut active = model.into_active_model();
    active.amount_paid = Set(statement.amount_paid);
    active.status = Set(BillingStatus::from(statement.status));
    active.paid_at = Set(statement.paid_at.map(|at| at.fixed_offset()));
    active.updated_at = Set(Utc::now().fixed_offset());
    active.update(txn).await?;
    Ok(())
}
