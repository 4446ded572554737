//! Pure aggregation over already-loaded records. The store pre-filters by
//! range for efficiency, but membership is decided here.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use time::{Date, Month};
use uuid::Uuid;

use crate::{error::AppError, expenses::repo_types::Expense, incomes::repo_types::Income, validate};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SummaryError {
    #[error("{0}")]
    InvalidRange(String),
    #[error("{kind} {id} has a negative amount")]
    InvalidAmount { kind: &'static str, id: Uuid },
}

impl From<SummaryError> for AppError {
    fn from(e: SummaryError) -> Self {
        match e {
            SummaryError::InvalidRange(msg) => AppError::InvalidRange(msg),
            e @ SummaryError::InvalidAmount { .. } => AppError::InvalidAmount(e.to_string()),
        }
    }
}

/// Inclusive calendar range: first day 00:00:00 through last day 23:59:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    #[serde(with = "validate::iso_date")]
    start: Date,
    #[serde(with = "validate::iso_date")]
    end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, SummaryError> {
        if start > end {
            return Err(SummaryError::InvalidRange(
                "start must not be after end".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn month(year: i32, month: Month) -> Result<Self, SummaryError> {
        let invalid = || SummaryError::InvalidRange(format!("{year}-{:02} is out of range", month as u8));
        let start = Date::from_calendar_date(year, month, 1).map_err(|_| invalid())?;
        let last = month.length(year);
        let end = Date::from_calendar_date(year, month, last).map_err(|_| invalid())?;
        Ok(Self { start, end })
    }

    pub fn month_of(day: Date) -> Self {
        let start = day.replace_day(1).unwrap_or(day);
        let last = day.month().length(day.year());
        let end = day.replace_day(last).unwrap_or(day);
        Self { start, end }
    }

    /// Parses `YYYY-MM`.
    pub fn parse_month(raw: &str) -> Result<Self, SummaryError> {
        let invalid = || SummaryError::InvalidRange(format!("month must be YYYY-MM, got {raw:?}"));
        let (y, m) = raw.trim().split_once('-').ok_or_else(invalid)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u8 = m.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;
        Self::month(year, month)
    }

    /// Both bounds are required.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, SummaryError> {
        let bound = |name: &str, raw: Option<&str>| -> Result<Date, SummaryError> {
            let raw = raw
                .filter(|r| !r.trim().is_empty())
                .ok_or_else(|| SummaryError::InvalidRange(format!("{name} is required")))?;
            validate::parse_date(raw)
                .ok_or_else(|| SummaryError::InvalidRange(format!("{name} must be a date (YYYY-MM-DD)")))
        };
        Self::new(bound("start", start)?, bound("end", end)?)
    }

    /// Range filter from optional query parameters: none given means no filter.
    pub fn parse_optional(start: Option<&str>, end: Option<&str>) -> Result<Option<Self>, SummaryError> {
        if start.is_none() && end.is_none() {
            return Ok(None);
        }
        Self::parse(start, end).map(Some)
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    #[cfg(test)]
    pub fn starts_at(&self) -> time::PrimitiveDateTime {
        time::PrimitiveDateTime::new(self.start, time::Time::MIDNIGHT)
    }

    #[cfg(test)]
    pub fn ends_at(&self) -> time::PrimitiveDateTime {
        time::PrimitiveDateTime::new(self.end, time::macros::time!(23:59:59))
    }

    pub fn contains(&self, day: Date) -> bool {
        self.start <= day && day <= self.end
    }

    /// Interval intersection; an open end runs forever.
    pub fn overlaps(&self, start: Date, end: Option<Date>) -> bool {
        start <= self.end && end.map_or(true, |e| e >= self.start)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    #[serde(flatten)]
    pub range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetAlert {
    pub exceeded: bool,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,
    pub message: String,
}

fn checked(kind: &'static str, id: Uuid, amount: Decimal) -> Result<Decimal, SummaryError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(SummaryError::InvalidAmount { kind, id });
    }
    Ok(amount)
}

pub fn summarize<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
    incomes: impl IntoIterator<Item = &'a Income>,
    range: DateRange,
) -> Result<Summary, SummaryError> {
    let mut total_expense = Decimal::ZERO;
    for e in expenses {
        if e.schedule.is_active_in(&range) {
            total_expense += checked("expense", e.id, e.amount)?;
        }
    }

    let mut total_income = Decimal::ZERO;
    for i in incomes {
        if range.contains(i.date) {
            total_income += checked("income", i.id, i.amount)?;
        }
    }

    Ok(Summary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        range,
    })
}

pub fn budget_alert(summary: &Summary) -> BudgetAlert {
    if summary.total_expense > summary.total_income {
        let over = summary.total_expense - summary.total_income;
        BudgetAlert {
            exceeded: true,
            amount: Some(over),
            message: format!("budget exceeded by {:.2}", over),
        }
    } else {
        BudgetAlert {
            exceeded: false,
            amount: None,
            message: "budget respected".into(),
        }
    }
}
