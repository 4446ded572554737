use time::{Date, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::engine::{self, BudgetAlert, DateRange, Summary};
use crate::{error::AppResult, state::AppState};

/// Server-local calendar day, UTC when the local offset is unknown.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

pub async fn range_summary(state: &AppState, user_id: Uuid, range: DateRange) -> AppResult<Summary> {
    let (expenses, incomes) = tokio::try_join!(
        state.expenses.list(user_id, Some(range)),
        state.incomes.list(user_id, Some(range)),
    )?;
    debug!(
        %user_id,
        expenses = expenses.len(),
        incomes = incomes.len(),
        "summarizing range"
    );
    Ok(engine::summarize(&expenses, &incomes, range)?)
}

/// `month` is `YYYY-MM`; the current month when absent.
pub async fn monthly_summary(
    state: &AppState,
    user_id: Uuid,
    month: Option<&str>,
) -> AppResult<Summary> {
    let range = match month.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => DateRange::parse_month(m)?,
        None => DateRange::month_of(today()),
    };
    range_summary(state, user_id, range).await
}

pub async fn budget_alert(state: &AppState, user_id: Uuid) -> AppResult<BudgetAlert> {
    let summary = monthly_summary(state, user_id, None).await?;
    Ok(engine::budget_alert(&summary))
}
