//! Boundary parsing shared by the resource handlers. Request bodies arrive
//! with optional, loosely typed fields; these helpers turn them into typed
//! values once, naming the offending field on failure.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

use crate::error::AppError;

const MAX_TEXT_LEN: usize = 255;

// Largest value a NUMERIC(12, 2) column holds, in cents.
const MAX_AMOUNT_CENTS: i64 = 999_999_999_999;

// `YYYY-MM-DD` on the wire for every calendar date.
time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

pub fn required_text(field: &'static str, value: Option<String>) -> Result<String, AppError> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::invalid(field, "is required"))?;
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::invalid(field, "is too long"));
    }
    Ok(value)
}

/// Blank strings collapse to `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts a JSON number or a numeric string. The amount must be positive
/// with at most two fractional digits.
pub fn amount(field: &'static str, value: Option<&Value>) -> Result<Decimal, AppError> {
    let parsed = match value {
        None | Some(Value::Null) => return Err(AppError::invalid(field, "is required")),
        Some(Value::Number(n)) => parse_decimal(&n.to_string()),
        Some(Value::String(s)) => parse_decimal(s.trim()),
        Some(_) => None,
    }
    .ok_or_else(|| AppError::invalid(field, "must be a number"))?;

    if parsed <= Decimal::ZERO {
        return Err(AppError::invalid(field, "must be positive"));
    }
    if parsed.normalize().scale() > 2 {
        return Err(AppError::invalid(field, "must have at most two decimal places"));
    }
    if parsed > Decimal::new(MAX_AMOUNT_CENTS, 2) {
        return Err(AppError::invalid(field, "is too large"));
    }
    Ok(parsed)
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// `YYYY-MM-DD`, or an RFC 3339 timestamp whose calendar date is used.
pub fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .or_else(|| OffsetDateTime::parse(raw, &Rfc3339).ok().map(|dt| dt.date()))
}

pub fn required_date(field: &'static str, value: Option<&str>) -> Result<Date, AppError> {
    let raw = value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::invalid(field, "is required"))?;
    parse_date(raw).ok_or_else(|| AppError::invalid(field, "must be a date (YYYY-MM-DD)"))
}

pub fn optional_date(field: &'static str, value: Option<&str>) -> Result<Option<Date>, AppError> {
    match value.filter(|v| !v.trim().is_empty()) {
        None => Ok(None),
        Some(raw) => parse_date(raw)
            .map(Some)
            .ok_or_else(|| AppError::invalid(field, "must be a date (YYYY-MM-DD)")),
    }
}
