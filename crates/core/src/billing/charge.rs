//! Additional charges and discounts.
//!
//! Charge rows arrive loosely typed: the amount may be a JSON number or a
//! numeric string, and the category may be missing. They are tagged into
//! [`Charge`] at the boundary; rows that cannot be tagged are reported as
//! [`SkippedCharge`].

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::amount::{MAX_STORED, STORED_SCALE, ensure_storable};

/// Category of a charge row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeCategory {
    /// Adds to the total.
    Additional,
    /// Subtracts from the total.
    Discount,
}

impl ChargeCategory {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Additional => "additional",
            Self::Discount => "discount",
        }
    }
}

/// A charge row as submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCharge {
    /// `"additional"` (default) or `"discount"`.
    #[serde(default)]
    pub category: Option<String>,
    /// Free-text label.
    #[serde(default, rename = "type")]
    pub label: Option<String>,
    /// Number or numeric string.
    #[serde(default)]
    pub amount: Option<Value>,
}

/// A validated charge line.
///
/// Amounts are stored as magnitudes; the variant carries the sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Charge {
    /// Added to the statement total.
    Additional {
        /// Label.
        #[serde(rename = "type")]
        label: String,
        /// Amount added.
        amount: Decimal,
    },
    /// Subtracted from the statement total.
    Discount {
        /// Label.
        #[serde(rename = "type")]
        label: String,
        /// Amount subtracted.
        amount: Decimal,
    },
}

impl Charge {
    /// Builds a charge from its stored parts.
    #[must_use]
    pub fn new(category: ChargeCategory, label: impl Into<String>, amount: Decimal) -> Self {
        let label = label.into();
        match category {
            ChargeCategory::Additional => Self::Additional { label, amount },
            ChargeCategory::Discount => Self::Discount { label, amount },
        }
    }

    /// Category.
    #[must_use]
    pub const fn category(&self) -> ChargeCategory {
        match self {
            Self::Additional { .. } => ChargeCategory::Additional,
            Self::Discount { .. } => ChargeCategory::Discount,
        }
    }

    /// Label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Additional { label, .. } | Self::Discount { label, .. } => label,
        }
    }

    /// Magnitude.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        match self {
            Self::Additional { amount, .. } | Self::Discount { amount, .. } => *amount,
        }
    }

    /// Contribution to the statement total.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self {
            Self::Additional { amount, .. } => *amount,
            Self::Discount { amount, .. } => -*amount,
        }
    }
}

/// A charge row that was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedCharge {
    /// Position in the submitted list.
    pub index: usize,
    /// Why it was dropped.
    pub reason: String,
}

/// Outcome of parsing a submitted charge list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCharges {
    /// Valid charges, in submitted order.
    pub charges: Vec<Charge>,
    /// Rows that were dropped.
    pub skipped: Vec<SkippedCharge>,
}

/// Parses a JSON number or numeric string into a decimal.
///
/// Returns `None` for null, empty strings, and anything non-numeric.
#[must_use]
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Tags one submitted row.
///
/// A negative `additional` amount is treated as a discount of its magnitude.
///
/// # Errors
///
/// Returns a reason when the label is empty, the amount is missing,
/// non-numeric or unstorable, or the category is unknown.
pub fn parse_charge(raw: &RawCharge) -> Result<Charge, String> {
    let label = raw.label.as_deref().map(str::trim).unwrap_or_default();
    if label.is_empty() {
        return Err("type label is empty".to_string());
    }

    let amount = raw
        .amount
        .as_ref()
        .and_then(parse_decimal)
        .ok_or_else(|| format!("amount of '{label}' is not numeric"))?;
    ensure_storable("amount", amount).map_err(|_| {
        format!(
            "amount of '{label}' must be within {MAX_STORED} with at most {STORED_SCALE} decimal places"
        )
    })?;

    let category = match raw.category.as_deref().map(str::trim) {
        None | Some("" | "additional") => ChargeCategory::Additional,
        Some("discount") => ChargeCategory::Discount,
        Some(other) => return Err(format!("unknown category '{other}'")),
    };

    let category = if amount.is_sign_negative() {
        ChargeCategory::Discount
    } else {
        category
    };

    Ok(Charge::new(category, label, amount.abs()))
}

/// Parses a submitted list, keeping valid rows in order.
#[must_use]
pub fn parse_charges(raw: &[RawCharge]) -> ParsedCharges {
    let mut parsed = ParsedCharges::default();

    for (index, row) in raw.iter().enumerate() {
        match parse_charge(row) {
            Ok(charge) => parsed.charges.push(charge),
            Err(reason) => parsed.skipped.push(SkippedCharge { index, reason }),
        }
    }

    parsed
}

/// Net contribution of a charge list to the statement total, or `None` on
/// overflow.
#[must_use]
pub fn net_charges(charges: &[Charge]) -> Option<Decimal> {
    charges
        .iter()
        .try_fold(Decimal::ZERO, |net, charge| net.checked_add(charge.signed_amount()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn raw(category: Option<&str>, label: Option<&str>, amount: Value) -> RawCharge {
        RawCharge {
            category: category.map(str::to_string),
            label: label.map(str::to_string),
            amount: Some(amount),
        }
    }

    #[rstest]
    #[case(json!(150), Some(dec!(150)))]
    #[case(json!(12.5), Some(dec!(12.5)))]
    #[case(json!("99.90"), Some(dec!(99.90)))]
    #[case(json!(" 42 "), Some(dec!(42)))]
    #[case(json!("1e3"), Some(dec!(1000)))]
    #[case(json!("-20"), Some(dec!(-20)))]
    #[case(json!(""), None)]
    #[case(json!("abc"), None)]
    #[case(json!(null), None)]
    #[case(json!(true), None)]
    fn test_parse_decimal(#[case] value: Value, #[case] expected: Option<Decimal>) {
        assert_eq!(parse_decimal(&value), expected);
    }

    #[test]
    fn test_category_defaults_to_additional() {
        let charge = parse_charge(&raw(None, Some("Parking"), json!("500"))).unwrap();
        assert_eq!(charge, Charge::new(ChargeCategory::Additional, "Parking", dec!(500)));
    }

    #[test]
    fn test_discount_stored_as_magnitude() {
        let charge = parse_charge(&raw(Some("discount"), Some("Promo"), json!(-100))).unwrap();

        assert_eq!(charge.category(), ChargeCategory::Discount);
        assert_eq!(charge.amount(), dec!(100));
        assert_eq!(charge.signed_amount(), dec!(-100));
    }

    #[test]
    fn test_negative_additional_becomes_discount() {
        let charge = parse_charge(&raw(Some("additional"), Some("Refund"), json!(-25))).unwrap();
        assert_eq!(charge, Charge::new(ChargeCategory::Discount, "Refund", dec!(25)));
    }

    #[test]
    fn test_label_is_trimmed() {
        let charge = parse_charge(&raw(None, Some("  Cleaning  "), json!(80))).unwrap();
        assert_eq!(charge.label(), "Cleaning");
    }

    #[rstest]
    #[case(raw(None, Some("   "), json!(10)))]
    #[case(raw(None, None, json!(10)))]
    #[case(raw(None, Some("Parking"), json!("ten")))]
    #[case(raw(Some("penalty"), Some("Late fee"), json!(10)))]
    #[case(RawCharge { category: None, label: Some("Parking".into()), amount: None })]
    #[case(raw(None, Some("Parking"), json!("1000000000000")))]
    #[case(raw(Some("discount"), Some("Promo"), json!("-79228162514264337593543950335")))]
    #[case(raw(None, Some("Parking"), json!("10.00005")))]
    fn test_malformed_rows_rejected(#[case] row: RawCharge) {
        assert!(parse_charge(&row).is_err());
    }

    #[test]
    fn test_parse_charges_skips_and_reports() {
        let rows = vec![
            raw(None, Some("Parking"), json!(500)),
            raw(None, Some(""), json!(10)),
            raw(Some("discount"), Some("Promo"), json!("100")),
            raw(None, Some("Internet"), json!("n/a")),
        ];

        let parsed = parse_charges(&rows);

        assert_eq!(parsed.charges.len(), 2);
        assert_eq!(parsed.charges[0].label(), "Parking");
        assert_eq!(parsed.charges[1].label(), "Promo");
        assert_eq!(
            parsed.skipped.iter().map(|s| s.index).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(net_charges(&parsed.charges), Some(dec!(400)));
    }

    #[test]
    fn test_raw_charge_deserializes_type_field() {
        let row: RawCharge =
            serde_json::from_value(json!({ "type": "Parking", "amount": "500" })).unwrap();

        assert_eq!(row.category, None);
        assert_eq!(row.label.as_deref(), Some("Parking"));
        assert_eq!(row.amount, Some(json!("500")));
    }

    #[test]
    fn test_charge_serializes_tagged() {
        let value = serde_json::to_value(Charge::new(ChargeCategory::Discount, "Promo", dec!(100)))
            .unwrap();

        assert_eq!(value["category"], "discount");
        assert_eq!(value["type"], "Promo");
    }
}
