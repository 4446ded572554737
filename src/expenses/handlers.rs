use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{dto::ExpenseRequest, repo_types::Expense};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
    summary::{dto::RangeQuery, engine::DateRange},
};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/api/expenses", get(list_expenses).post(create_expense))
        .route(
            "/api/expenses/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}

fn unknown_category() -> AppError {
    AppError::invalid("categoryId", "unknown category")
}

#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<RangeQuery>,
) -> AppResult<Json<Vec<Expense>>> {
    let range = DateRange::parse_optional(q.start.as_deref(), q.end.as_deref())?;
    Ok(Json(state.expenses.list(user_id, range).await?))
}

#[instrument(skip(state))]
pub async fn get_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Expense>> {
    match state.expenses.get(user_id, id).await? {
        Some(e) => Ok(Json(e)),
        None => {
            warn!(%user_id, %id, "expense not owned by caller");
            Err(AppError::Forbidden)
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn create_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ExpenseRequest>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let input = payload.validate()?;
    let Some(expense) = state.expenses.create(user_id, input).await? else {
        return Err(unknown_category());
    };
    info!(%user_id, expense_id = %expense.id, "expense created");
    Ok((StatusCode::CREATED, Json(expense)))
}

#[instrument(skip(state, payload))]
pub async fn update_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseRequest>,
) -> AppResult<Json<Expense>> {
    let input = payload.validate()?;
    if let Some(e) = state.expenses.update(user_id, id, input).await? {
        return Ok(Json(e));
    }
    // Nothing matched: either the expense or the category is not the caller's.
    if state.expenses.get(user_id, id).await?.is_none() {
        warn!(%user_id, %id, "expense update denied");
        return Err(AppError::Forbidden);
    }
    Err(unknown_category())
}

#[instrument(skip(state))]
pub async fn delete_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if state.expenses.delete(user_id, id).await? {
        info!(%user_id, expense_id = %id, "expense deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        warn!(%user_id, %id, "expense delete denied");
        Err(AppError::Forbidden)
    }
}
