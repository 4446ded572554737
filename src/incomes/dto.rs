use serde::Deserialize;
use serde_json::Value;

use super::repo_types::IncomeInput;
use crate::{
    error::AppError,
    validate::{self, optional_text, required_text},
};

#[derive(Debug, Default, Deserialize)]
pub struct IncomeRequest {
    pub title: Option<String>,
    pub amount: Option<Value>,
    pub date: Option<String>,
    pub description: Option<String>,
}

impl IncomeRequest {
    pub fn validate(self) -> Result<IncomeInput, AppError> {
        Ok(IncomeInput {
            title: required_text("title", self.title)?,
            amount: validate::amount("amount", self.amount.as_ref())?,
            date: validate::required_date("date", self.date.as_deref())?,
            description: optional_text(self.description),
        })
    }
}
