use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{MonthQuery, RangeQuery},
    engine::{BudgetAlert, DateRange, Summary},
    service,
};
use crate::{auth::AuthUser, error::AppResult, state::AppState};

pub fn summary_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(range_summary))
        .route("/summary/monthly", get(monthly_summary))
        .route("/summary/alerts", get(budget_alert))
}

#[instrument(skip(state))]
pub async fn monthly_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<MonthQuery>,
) -> AppResult<Json<Summary>> {
    Ok(Json(
        service::monthly_summary(&state, user_id, q.month.as_deref()).await?,
    ))
}

#[instrument(skip(state))]
pub async fn range_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<RangeQuery>,
) -> AppResult<Json<Summary>> {
    let range = DateRange::parse(q.start.as_deref(), q.end.as_deref())?;
    Ok(Json(service::range_summary(&state, user_id, range).await?))
}

#[instrument(skip(state))]
pub async fn budget_alert(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<BudgetAlert>> {
    Ok(Json(service::budget_alert(&state, user_id).await?))
}
