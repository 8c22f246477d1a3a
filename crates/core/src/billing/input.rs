//! Parsing of raw billing requests.
//!
//! Readings and amounts may arrive as JSON numbers or numeric strings. A
//! utility's readings are processed only when both values are present and
//! non-empty.

use chrono::{DateTime, NaiveDate};
use leasehold_shared::types::UnitId;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::amount::ensure_storable;
use super::charge::{RawCharge, parse_decimal};
use super::error::BillingError;
use super::types::{ReadingPair, SaveBillingInput};

/// Billing request body as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingRequest {
    /// Reading date, `YYYY-MM-DD` or RFC 3339.
    #[serde(default)]
    pub reading_date: Option<String>,
    /// Due date, `YYYY-MM-DD` or RFC 3339.
    #[serde(default)]
    pub due_date: Option<String>,
    /// Previous water meter value.
    #[serde(default)]
    pub water_prev_reading: Option<Value>,
    /// Current water meter value.
    #[serde(default)]
    pub water_current_reading: Option<Value>,
    /// Previous electricity meter value.
    #[serde(default)]
    pub electricity_prev_reading: Option<Value>,
    /// Current electricity meter value.
    #[serde(default)]
    pub electricity_current_reading: Option<Value>,
    /// Caller water aggregate.
    #[serde(default)]
    pub total_water_amount: Option<Value>,
    /// Caller electricity aggregate.
    #[serde(default)]
    pub total_electricity_amount: Option<Value>,
    /// Caller statement total.
    #[serde(default)]
    pub total_amount_due: Option<Value>,
    /// Additional charges and discounts.
    #[serde(default)]
    pub additional_charges: Vec<RawCharge>,
}

impl BillingRequest {
    /// Validates the request for `unit_id`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when a required field is missing or malformed, or
    /// an amount is negative or does not fit storage.
    pub fn into_input(self, unit_id: UnitId) -> Result<SaveBillingInput, BillingError> {
        let reading_date = parse_date("readingDate", self.reading_date.as_deref())?;
        let due_date = parse_date("dueDate", self.due_date.as_deref())?;

        let water = reading_pair(
            ("waterPrevReading", self.water_prev_reading.as_ref()),
            ("waterCurrentReading", self.water_current_reading.as_ref()),
        )?;
        let electricity = reading_pair(
            ("electricityPrevReading", self.electricity_prev_reading.as_ref()),
            (
                "electricityCurrentReading",
                self.electricity_current_reading.as_ref(),
            ),
        )?;

        let total_water_amount =
            optional_amount("totalWaterAmount", self.total_water_amount.as_ref())?;
        let total_electricity_amount = optional_amount(
            "totalElectricityAmount",
            self.total_electricity_amount.as_ref(),
        )?;
        let total_amount_due = optional_amount("totalAmountDue", self.total_amount_due.as_ref())?
            .ok_or_else(|| BillingError::Validation("totalAmountDue is required".into()))?;

        Ok(SaveBillingInput {
            unit_id,
            reading_date,
            due_date,
            water,
            electricity,
            total_water_amount,
            total_electricity_amount,
            total_amount_due,
            additional_charges: self.additional_charges,
        })
    }
}

/// Parses a unit id taken from a route.
///
/// # Errors
///
/// Returns `Validation` if `raw` is not a UUID.
pub fn parse_unit_id(raw: &str) -> Result<UnitId, BillingError> {
    raw.trim()
        .parse()
        .map_err(|_| BillingError::Validation(format!("unitId '{raw}' is not a valid id")))
}

fn parse_date(field: &str, raw: Option<&str>) -> Result<NaiveDate, BillingError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BillingError::Validation(format!("{field} is required")))?;

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| BillingError::Validation(format!("{field} '{raw}' is not a valid date")))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn optional_amount(field: &str, value: Option<&Value>) -> Result<Option<Decimal>, BillingError> {
    let Some(value) = value.filter(|v| !is_blank(v)) else {
        return Ok(None);
    };

    let amount = parse_decimal(value)
        .ok_or_else(|| BillingError::Validation(format!("{field} is not numeric")))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(BillingError::Validation(format!(
            "{field} must not be negative"
        )));
    }

    ensure_storable(field, amount).map(Some)
}

fn reading_pair(
    previous: (&str, Option<&Value>),
    current: (&str, Option<&Value>),
) -> Result<Option<ReadingPair>, BillingError> {
    let previous = optional_amount(previous.0, previous.1)?;
    let current = optional_amount(current.0, current.1)?;

    Ok(previous
        .zip(current)
        .map(|(previous, current)| ReadingPair { previous, current }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn request(body: Value) -> BillingRequest {
        serde_json::from_value(body).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_full_request() {
        let input = request(json!({
            "readingDate": "2024-03-15",
            "dueDate": "2024-03-25T00:00:00Z",
            "waterPrevReading": 100,
            "waterCurrentReading": "150",
            "electricityPrevReading": "1200.5",
            "electricityCurrentReading": 1210.75,
            "totalWaterAmount": "125",
            "totalAmountDue": 5485,
            "additionalCharges": [{ "type": "Parking", "amount": 500 }]
        }))
        .into_input(UnitId::new())
        .unwrap();

        assert_eq!(input.reading_date, date(2024, 3, 15));
        assert_eq!(input.due_date, date(2024, 3, 25));
        assert_eq!(
            input.water,
            Some(ReadingPair {
                previous: dec!(100),
                current: dec!(150)
            })
        );
        assert_eq!(
            input.electricity,
            Some(ReadingPair {
                previous: dec!(1200.5),
                current: dec!(1210.75)
            })
        );
        assert_eq!(input.total_water_amount, Some(dec!(125)));
        assert_eq!(input.total_electricity_amount, None);
        assert_eq!(input.total_amount_due, dec!(5485));
        assert_eq!(input.additional_charges.len(), 1);
    }

    #[test]
    fn test_incomplete_pair_is_ignored() {
        let input = request(json!({
            "readingDate": "2024-03-15",
            "dueDate": "2024-03-25",
            "waterPrevReading": 100,
            "waterCurrentReading": "",
            "electricityCurrentReading": 10,
            "totalAmountDue": "5000"
        }))
        .into_input(UnitId::new())
        .unwrap();

        assert!(input.water.is_none());
        assert!(input.electricity.is_none());
        assert!(input.additional_charges.is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        let missing_due = request(json!({ "readingDate": "2024-03-15", "totalAmountDue": 1 }));
        let missing_total = request(json!({ "readingDate": "2024-03-15", "dueDate": "2024-03-25" }));
        let bad_date = request(json!({
            "readingDate": "15/03/2024", "dueDate": "2024-03-25", "totalAmountDue": 1
        }));

        for req in [missing_due, missing_total, bad_date] {
            assert!(matches!(
                req.into_input(UnitId::new()),
                Err(BillingError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_negative_and_non_numeric_amounts_rejected() {
        let negative = request(json!({
            "readingDate": "2024-03-15", "dueDate": "2024-03-25",
            "totalAmountDue": 100, "totalWaterAmount": -5
        }));
        let garbage = request(json!({
            "readingDate": "2024-03-15", "dueDate": "2024-03-25",
            "totalAmountDue": 100, "waterPrevReading": "abc", "waterCurrentReading": 5
        }));

        assert!(negative.into_input(UnitId::new()).is_err());
        assert!(garbage.into_input(UnitId::new()).is_err());
    }

    #[test]
    fn test_out_of_range_reading_rejected() {
        let huge = request(json!({
            "readingDate": "2024-03-15", "dueDate": "2024-03-25",
            "totalAmountDue": 100,
            "waterPrevReading": 0,
            "waterCurrentReading": "79228162514264337593543950335"
        }));
        let just_over = request(json!({
            "readingDate": "2024-03-15", "dueDate": "2024-03-25",
            "totalAmountDue": "1000000000000"
        }));

        for req in [huge, just_over] {
            assert!(matches!(
                req.into_input(UnitId::new()),
                Err(BillingError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_excess_decimal_places_rejected() {
        let precise = request(json!({
            "readingDate": "2024-03-15", "dueDate": "2024-03-25",
            "totalAmountDue": "100.12345"
        }));
        let trailing_zeros = request(json!({
            "readingDate": "2024-03-15", "dueDate": "2024-03-25",
            "totalAmountDue": "100.1200000"
        }));

        let err = precise.into_input(UnitId::new()).unwrap_err();
        assert!(err.to_string().contains("totalAmountDue"));
        assert_eq!(
            trailing_zeros.into_input(UnitId::new()).unwrap().total_amount_due,
            dec!(100.12)
        );
    }

    #[test]
    fn test_parse_unit_id() {
        let id = UnitId::new();
        assert_eq!(parse_unit_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_unit_id("unit-12"),
            Err(BillingError::Validation(_))
        ));
    }
}
