use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{summary::engine::DateRange, validate::iso_date};

pub const KIND_ONE_TIME: &str = "one-time";
pub const KIND_RECURRING: &str = "recurring";

/// When an expense applies. The variant decides which dates are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ExpenseSchedule {
    OneTime {
        #[serde(with = "iso_date")]
        date: Date,
    },
    Recurring {
        #[serde(with = "iso_date")]
        start_date: Date,
        #[serde(with = "iso_date::option")]
        end_date: Option<Date>,
    },
}

impl ExpenseSchedule {
    pub fn kind(&self) -> &'static str {
        match self {
            ExpenseSchedule::OneTime { .. } => KIND_ONE_TIME,
            ExpenseSchedule::Recurring { .. } => KIND_RECURRING,
        }
    }

    /// One-time expenses by date membership, recurring ones by overlap.
    pub fn is_active_in(&self, range: &DateRange) -> bool {
        match *self {
            ExpenseSchedule::OneTime { date } => range.contains(date),
            ExpenseSchedule::Recurring {
                start_date,
                end_date,
            } => range.overlaps(start_date, end_date),
        }
    }

    /// Column values `(date, start_date, end_date)`.
    pub fn columns(&self) -> (Option<Date>, Option<Date>, Option<Date>) {
        match *self {
            ExpenseSchedule::OneTime { date } => (Some(date), None, None),
            ExpenseSchedule::Recurring {
                start_date,
                end_date,
            } => (None, Some(start_date), end_date),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(flatten)]
    pub schedule: ExpenseSchedule,
    pub description: Option<String>,
    pub receipt: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Row shape as stored; converted into [`Expense`] after loading.
#[derive(Debug, FromRow)]
pub struct ExpenseRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub category_name: Option<String>,
    pub title: String,
    pub amount: Decimal,
    pub kind: String,
    pub date: Option<Date>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub description: Option<String>,
    pub receipt: Option<String>,
    pub created_at: OffsetDateTime,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = anyhow::Error;

    fn try_from(r: ExpenseRow) -> Result<Self, Self::Error> {
        let schedule = match (r.kind.as_str(), r.date, r.start_date) {
            (KIND_ONE_TIME, Some(date), _) => ExpenseSchedule::OneTime { date },
            (KIND_RECURRING, _, Some(start_date)) => ExpenseSchedule::Recurring {
                start_date,
                end_date: r.end_date,
            },
            (kind, _, _) => anyhow::bail!("expense {} has inconsistent schedule ({kind})", r.id),
        };
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            category_id: r.category_id,
            category_name: r.category_name,
            title: r.title,
            amount: r.amount,
            schedule,
            description: r.description,
            receipt: r.receipt,
            created_at: r.created_at,
        })
    }
}

/// Validated create/update command.
#[derive(Debug, Clone)]
pub struct ExpenseInput {
    pub category_id: Uuid,
    pub title: String,
    pub amount: Decimal,
    pub schedule: ExpenseSchedule,
    pub description: Option<String>,
    pub receipt: Option<String>,
}
