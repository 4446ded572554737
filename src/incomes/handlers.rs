use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{dto::IncomeRequest, repo_types::Income};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
    summary::{dto::RangeQuery, engine::DateRange},
};

pub fn income_routes() -> Router<AppState> {
    Router::new()
        .route("/api/incomes", get(list_incomes).post(create_income))
        .route(
            "/api/incomes/:id",
            get(get_income).put(update_income).delete(delete_income),
        )
}

#[instrument(skip(state))]
pub async fn list_incomes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<RangeQuery>,
) -> AppResult<Json<Vec<Income>>> {
    let range = DateRange::parse_optional(q.start.as_deref(), q.end.as_deref())?;
    Ok(Json(state.incomes.list(user_id, range).await?))
}

#[instrument(skip(state))]
pub async fn get_income(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Income>> {
    state.incomes.get(user_id, id).await?.map(Json).ok_or_else(|| {
        warn!(%user_id, %id, "income not owned by caller");
        AppError::Forbidden
    })
}

#[instrument(skip(state, payload))]
pub async fn create_income(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<IncomeRequest>,
) -> AppResult<(StatusCode, Json<Income>)> {
    let input = payload.validate()?;
    let income = state.incomes.create(user_id, input).await?;
    info!(%user_id, income_id = %income.id, "income created");
    Ok((StatusCode::CREATED, Json(income)))
}

#[instrument(skip(state, payload))]
pub async fn update_income(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<IncomeRequest>,
) -> AppResult<Json<Income>> {
    let input = payload.validate()?;
    state
        .incomes
        .update(user_id, id, input)
        .await?
        .map(Json)
        .ok_or_else(|| {
            warn!(%user_id, %id, "income update denied");
            AppError::Forbidden
        })
}

#[instrument(skip(state))]
pub async fn delete_income(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.incomes.delete(user_id, id).await? {
        warn!(%user_id, %id, "income delete denied");
        return Err(AppError::Forbidden);
    }
    info!(%user_id, income_id = %id, "income deleted");
    Ok(StatusCode::NO_CONTENT)
}
