//! Billing statement routes: save, read, pay, and settle.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use leasehold_core::billing::{BillingRequest, SaveOutcome, parse_unit_id};
use leasehold_db::StatementRepository;
use leasehold_shared::types::PageRequest;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::{AppState, error::ApiResult, middleware::AuthUser};

/// Creates the billing routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/units/{unit_id}/billings",
            post(save_billing).get(list_billings),
        )
        .route("/billings/overdue", get(list_overdue))
        .route("/billings/{billing_id}", get(get_billing))
        .route("/billings/{billing_id}/payments", post(confirm_payment))
        .route("/billings/{billing_id}/settle", post(settle))
}

/// Request body for confirming a payment.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// Amount received.
    pub amount: Decimal,
}

/// Request body for settling from lease credits.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettleRequest {
    /// Also draw on the security deposit (move-out).
    pub use_deposit: bool,
}

/// POST `/units/{unit_id}/billings` - Create or update the unit's statement
/// for the month of `readingDate`.
async fn save_billing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(unit_id): Path<String>,
    Json(body): Json<BillingRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_landlord()?;

    let unit_id = parse_unit_id(&unit_id)?;
    let input = body.into_input(unit_id)?;
    let result = state.billing.save_or_update_billing(input).await?;

    info!(
        user_id = %auth.user_id(),
        billing_id = %result.billing_id,
        outcome = ?result.status,
        "Billing saved"
    );

    let status = match result.status {
        SaveOutcome::Created => StatusCode::CREATED,
        SaveOutcome::Updated => StatusCode::OK,
    };
    Ok((status, Json(result)))
}

/// GET `/units/{unit_id}/billings` - List a unit's statements, newest first.
async fn list_billings(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(unit_id): Path<String>,
    Query(page): Query<PageRequest>,
) -> ApiResult<impl IntoResponse> {
    let unit_id = parse_unit_id(&unit_id)?;
    let repo = StatementRepository::new((*state.db).clone());
    let statements = repo
        .list_statements(unit_id, &page, Utc::now().date_naive())
        .await?;

    Ok(Json(statements))
}

/// GET `/billings/overdue` - List statements past their due date.
async fn list_overdue(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let repo = StatementRepository::new((*state.db).clone());
    let statements = repo.list_overdue(Utc::now().date_naive()).await?;

    Ok(Json(statements))
}

/// GET `/billings/{billing_id}` - Statement with charges and readings.
async fn get_billing(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(billing_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let repo = StatementRepository::new((*state.db).clone());
    let detail = repo
        .get_statement(&billing_id, Utc::now().date_naive())
        .await?;

    Ok(Json(detail))
}

/// POST `/billings/{billing_id}/payments` - Record a payment.
async fn confirm_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(billing_id): Path<String>,
    Json(body): Json<PaymentRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_landlord()?;

    let repo = StatementRepository::new((*state.db).clone());
    let statement = repo.confirm_payment(&billing_id, body.amount).await?;

    Ok(Json(statement))
}

/// POST `/billings/{billing_id}/settle` - Cover the balance from the lease's
/// advance payment, and the deposit when `useDeposit` is set.
async fn settle(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(billing_id): Path<String>,
    Json(body): Json<SettleRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_landlord()?;

    let repo = StatementRepository::new((*state.db).clone());
    let result = repo.settle(&billing_id, body.use_deposit).await?;

    Ok(Json(result))
}
