//! Per-property utility rate routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::put,
};
use chrono::NaiveDate;
use leasehold_core::billing::UtilityType;
use leasehold_db::UtilityRateRepository;
use leasehold_shared::{AppError, types::PropertyId};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{AppState, error::ApiResult, middleware::AuthUser};

/// Creates the utility rate routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/properties/{property_id}/utility-rates",
        put(set_rate).get(list_rates),
    )
}

/// Request body for setting a rate.
#[derive(Debug, Deserialize)]
pub struct SetRateRequest {
    /// `water` or `electricity`.
    pub utility: UtilityType,
    /// Any date within the billing month.
    pub period: NaiveDate,
    /// Price per unit of usage.
    pub rate: Decimal,
}

fn parse_property_id(raw: &str) -> Result<PropertyId, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("propertyId '{raw}' is not a valid id")))
}

/// PUT `/properties/{property_id}/utility-rates` - Upsert the rate for a month.
async fn set_rate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(property_id): Path<String>,
    Json(body): Json<SetRateRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_landlord()?;

    let property_id = parse_property_id(&property_id)?;
    let repo = UtilityRateRepository::new((*state.db).clone());
    let rate = repo
        .set_rate(property_id, body.utility, body.period, body.rate)
        .await?;

    Ok(Json(rate))
}

/// GET `/properties/{property_id}/utility-rates` - List rates, newest month first.
async fn list_rates(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(property_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let property_id = parse_property_id(&property_id)?;
    let repo = UtilityRateRepository::new((*state.db).clone());

    Ok(Json(repo.list_rates(property_id).await?))
}
