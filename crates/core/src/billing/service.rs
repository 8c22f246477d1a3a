//! Billing statement assembler.

use std::sync::Arc;

use chrono::NaiveDate;
use leasehold_shared::{BillingConfig, ChargePolicy};
use leasehold_shared::types::{LeaseId, UnitId};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::amount::ensure_storable;
use super::charge::{ParsedCharges, parse_charges};
use super::error::BillingError;
use super::id::BillingIdGenerator;
use super::period::BillingPeriod;
use super::proration::prorated_rent;
use super::statement::{check_total, compute_total, reopen, utility_cost};
use super::store::{BillingStore, BillingTx};
use super::types::{
    MeterReadingRecord, SaveBillingInput, SaveBillingResult, SaveOutcome, StatementRecord,
    StatementStatus, UtilityLine, UtilityType,
};
use super::usage::compute_usage_cost;

/// Fields a save writes onto a statement.
struct Components {
    lease_id: LeaseId,
    billing_date: NaiveDate,
    due_date: NaiveDate,
    base_rent: Decimal,
    water_cost: Decimal,
    electricity_cost: Decimal,
    total_due: Decimal,
    computed_total: Decimal,
}

/// Assembles and persists billing statements.
pub struct BillingService<S, G> {
    store: Arc<S>,
    ids: G,
    config: BillingConfig,
}

impl<S: BillingStore, G: BillingIdGenerator> BillingService<S, G> {
    /// Creates a new billing service.
    #[must_use]
    pub fn new(store: Arc<S>, ids: G, config: BillingConfig) -> Self {
        Self { store, ids, config }
    }

    /// Billing policies in effect.
    #[must_use]
    pub const fn config(&self) -> &BillingConfig {
        &self.config
    }

    /// Creates or updates the statement of a unit for the month of the
    /// reading date, in one transaction.
    ///
    /// Steps:
    /// 1. Resolve the unit's active or completed lease.
    /// 2. Compute each submitted utility and upsert its meter reading.
    /// 3. Update the month's statement in place, or insert a new one.
    /// 4. Replace the statement's charges with the submitted list.
    ///
    /// Any failure rolls the whole transaction back.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An amount is negative, or an input or computed amount does not fit storage
    /// - A charge row is malformed under the `reject` charge policy
    /// - The unit has no active or completed lease
    /// - The totals disagree under the `reject` total policy
    /// - The store fails or no unique statement id could be allocated
    pub async fn save_or_update_billing(
        &self,
        input: SaveBillingInput,
    ) -> Result<SaveBillingResult, BillingError> {
        validate_amounts(&input)?;
        let parsed = self.parse_charges(&input)?;

        let tx = self.store.begin().await?;

        match self.save_in_tx(&tx, &input, parsed).await {
            Ok(result) => {
                tx.commit().await?;
                info!(
                    billing_id = %result.billing_id,
                    unit_id = %input.unit_id,
                    outcome = ?result.status,
                    total_due = %result.total_due,
                    "Billing statement saved"
                );
                Ok(result)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Failed to roll back billing transaction");
                }
                Err(err)
            }
        }
    }

    fn parse_charges(&self, input: &SaveBillingInput) -> Result<ParsedCharges, BillingError> {
        let parsed = parse_charges(&input.additional_charges);

        if let Some(first) = parsed.skipped.first() {
            if self.config.charge_policy == ChargePolicy::Reject {
                return Err(BillingError::MalformedCharge(format!(
                    "row {}: {}",
                    first.index, first.reason
                )));
            }
            for skipped in &parsed.skipped {
                warn!(
                    unit_id = %input.unit_id,
                    index = skipped.index,
                    reason = %skipped.reason,
                    "Skipping malformed additional charge"
                );
            }
        }

        Ok(parsed)
    }

    async fn save_in_tx(
        &self,
        tx: &S::Tx,
        input: &SaveBillingInput,
        parsed: ParsedCharges,
    ) -> Result<SaveBillingResult, BillingError> {
        let lease = tx
            .find_lease_for_unit(input.unit_id)
            .await?
            .filter(|lease| lease.status.is_billable())
            .ok_or(BillingError::NoActiveLease(input.unit_id))?;

        let period = BillingPeriod::containing(input.reading_date);
        let base_rent = if self.config.prorate_first_month {
            prorated_rent(lease.monthly_rent, lease.start_date, period)?
        } else {
            lease.monthly_rent
        };

        let water = utility_line(tx, input, UtilityType::Water, period).await?;
        let electricity = utility_line(tx, input, UtilityType::Electricity, period).await?;

        let computed_total = ensure_storable(
            "computed total",
            compute_total(base_rent, water.cost, electricity.cost, &parsed.charges)?,
        )?;
        let total_mismatch =
            check_total(self.config.total_policy, input.total_amount_due, computed_total)?;
        if total_mismatch {
            warn!(
                unit_id = %input.unit_id,
                period = %period,
                supplied = %input.total_amount_due,
                computed = %computed_total,
                "Total amount due does not match computed total"
            );
        }

        let components = Components {
            lease_id: lease.id,
            billing_date: input.reading_date,
            due_date: input.due_date,
            base_rent,
            water_cost: water.cost,
            electricity_cost: electricity.cost,
            total_due: input.total_amount_due,
            computed_total,
        };

        let (statement, outcome) = match tx.find_statement(input.unit_id, period.start()).await? {
            Some(existing) => (
                self.update_existing(tx, existing, &components).await?,
                SaveOutcome::Updated,
            ),
            None => self.insert_new(tx, input.unit_id, period, &components).await?,
        };

        tx.replace_charges(&statement.id, &parsed.charges).await?;

        Ok(SaveBillingResult {
            billing_id: statement.id,
            status: outcome,
            billing_status: statement.status,
            total_due: statement.total_due,
            computed_total,
            total_mismatch,
            water,
            electricity,
            skipped_charges: parsed.skipped,
        })
    }

    async fn update_existing(
        &self,
        tx: &S::Tx,
        mut statement: StatementRecord,
        components: &Components,
    ) -> Result<StatementRecord, BillingError> {
        reopen(&mut statement, self.config.reopen_policy, components.total_due);

        statement.lease_id = components.lease_id;
        statement.billing_date = components.billing_date;
        statement.due_date = components.due_date;
        statement.base_rent = components.base_rent;
        statement.water_cost = components.water_cost;
        statement.electricity_cost = components.electricity_cost;
        statement.total_due = components.total_due;
        statement.computed_total = components.computed_total;

        tx.update_statement(&statement).await?;
        Ok(statement)
    }

    async fn insert_new(
        &self,
        tx: &S::Tx,
        unit_id: UnitId,
        period: BillingPeriod,
        components: &Components,
    ) -> Result<(StatementRecord, SaveOutcome), BillingError> {
        let max_attempts = self.config.max_id_attempts.max(1);

        for attempt in 1..=max_attempts {
            let statement = StatementRecord {
                id: self.ids.generate(),
                unit_id,
                lease_id: components.lease_id,
                period_start: period.start(),
                billing_date: components.billing_date,
                due_date: components.due_date,
                base_rent: components.base_rent,
                water_cost: components.water_cost,
                electricity_cost: components.electricity_cost,
                total_due: components.total_due,
                computed_total: components.computed_total,
                amount_paid: Decimal::ZERO,
                status: StatementStatus::Unpaid,
                paid_at: None,
            };

            match tx.insert_statement(&statement).await {
                Ok(()) => return Ok((statement, SaveOutcome::Created)),
                Err(BillingError::DuplicateIdentifier(id)) => {
                    // Lost the race for (unit, month): update the winner's row.
                    if let Some(existing) = tx.find_statement(unit_id, period.start()).await? {
                        debug!(
                            billing_id = %existing.id,
                            unit_id = %unit_id,
                            "Statement created concurrently, updating it"
                        );
                        let updated = self.update_existing(tx, existing, components).await?;
                        return Ok((updated, SaveOutcome::Updated));
                    }
                    debug!(billing_id = %id, attempt, "Billing id collision, regenerating");
                }
                Err(err) => return Err(err),
            }
        }

        Err(BillingError::Persistence(format!(
            "could not allocate a unique billing id after {max_attempts} attempts"
        )))
    }
}

async fn utility_line<T: BillingTx>(
    tx: &T,
    input: &SaveBillingInput,
    utility: UtilityType,
    period: BillingPeriod,
) -> Result<UtilityLine, BillingError> {
    let rate = tx.find_rate(input.unit_id, utility, period.start()).await?;

    let reading = match input.readings(utility) {
        Some(pair) => {
            let computed = compute_usage_cost(pair.previous, pair.current, rate)?;
            ensure_storable(&format!("{utility} usage"), computed.usage)?;
            ensure_storable(&format!("{utility} cost"), computed.cost)?;
            tx.upsert_meter_reading(&MeterReadingRecord {
                unit_id: input.unit_id,
                utility,
                reading_date: input.reading_date,
                previous_reading: pair.previous,
                current_reading: pair.current,
                usage: computed.usage,
                rate,
                cost: computed.cost,
            })
            .await?;
            Some(computed)
        }
        None => None,
    };

    let computed_cost = reading.filter(|_| rate.is_some()).map(|r| r.cost);

    Ok(UtilityLine {
        reading,
        rate,
        cost: utility_cost(computed_cost, input.supplied_amount(utility)),
    })
}

fn validate_amounts(input: &SaveBillingInput) -> Result<(), BillingError> {
    let negative = |value: Decimal| value < Decimal::ZERO;

    for utility in UtilityType::ALL {
        if let Some(pair) = input.readings(utility) {
            if negative(pair.previous) || negative(pair.current) {
                return Err(BillingError::Validation(format!(
                    "{utility} readings must not be negative"
                )));
            }
            ensure_storable(&format!("previous {utility} reading"), pair.previous)?;
            ensure_storable(&format!("current {utility} reading"), pair.current)?;
        }
        if let Some(amount) = input.supplied_amount(utility) {
            if negative(amount) {
                return Err(BillingError::Validation(format!(
                    "total {utility} amount must not be negative"
                )));
            }
            ensure_storable(&format!("total {utility} amount"), amount)?;
        }
    }

    if negative(input.total_amount_due) {
        return Err(BillingError::Validation(
            "totalAmountDue must not be negative".into(),
        ));
    }
    ensure_storable("totalAmountDue", input.total_amount_due)?;

    Ok(())
}
