use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::repo_types::{ExpenseInput, ExpenseSchedule, KIND_ONE_TIME, KIND_RECURRING};
use crate::{
    error::AppError,
    validate::{self, optional_text, required_text},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    pub title: Option<String>,
    pub amount: Option<Value>,
    pub category_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub receipt: Option<String>,
}

impl ExpenseRequest {
    pub fn validate(self) -> Result<ExpenseInput, AppError> {
        let title = required_text("title", self.title)?;
        let amount = validate::amount("amount", self.amount.as_ref())?;
        let category_id = self
            .category_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::invalid("categoryId", "is required"))?;
        let category_id = Uuid::parse_str(category_id)
            .map_err(|_| AppError::invalid("categoryId", "is not a valid id"))?;

        let kind = self
            .kind
            .as_deref()
            .map(|k| k.trim().to_ascii_lowercase())
            .ok_or_else(|| AppError::invalid("type", "is required"))?;
        let schedule = match kind.as_str() {
            KIND_ONE_TIME => ExpenseSchedule::OneTime {
                date: validate::required_date("date", self.date.as_deref())?,
            },
            KIND_RECURRING => {
                let start_date = validate::required_date("startDate", self.start_date.as_deref())?;
                let end_date = validate::optional_date("endDate", self.end_date.as_deref())?;
                if end_date.is_some_and(|end| end < start_date) {
                    return Err(AppError::invalid("endDate", "must not be before startDate"));
                }
                ExpenseSchedule::Recurring {
                    start_date,
                    end_date,
                }
            }
            _ => {
                return Err(AppError::invalid(
                    "type",
                    format!("must be \"{KIND_ONE_TIME}\" or \"{KIND_RECURRING}\""),
                ))
            }
        };

        Ok(ExpenseInput {
            category_id,
            title,
            amount,
            schedule,
            description: optional_text(self.description),
            receipt: optional_text(self.receipt),
        })
    }
}
