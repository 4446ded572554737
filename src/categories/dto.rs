use serde::Deserialize;

use super::repo_types::CategoryInput;
use crate::{
    error::AppError,
    validate::{optional_text, required_text},
};

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryRequest {
    pub fn validate(self) -> Result<CategoryInput, AppError> {
        Ok(CategoryInput {
            name: required_text("name", self.name)?,
            description: optional_text(self.description),
        })
    }
}
