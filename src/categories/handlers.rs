use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{dto::CategoryRequest, repo_types::Category, repo_types::DeleteOutcome};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route(
            "/api/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.list(user_id).await?))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    match state.categories.get(user_id, id).await? {
        Some(c) => Ok(Json(c)),
        None => {
            warn!(%user_id, %id, "category not owned by caller");
            Err(AppError::Forbidden)
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let input = payload.validate()?;
    let category = state.categories.create(user_id, input).await?;
    info!(%user_id, category_id = %category.id, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

#[instrument(skip(state, payload))]
pub async fn update_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<Json<Category>> {
    let input = payload.validate()?;
    match state.categories.update(user_id, id, input).await? {
        Some(c) => Ok(Json(c)),
        None => {
            warn!(%user_id, %id, "category update denied");
            Err(AppError::Forbidden)
        }
    }
}

#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    match state.categories.delete(user_id, id).await? {
        DeleteOutcome::Deleted => {
            info!(%user_id, category_id = %id, "category deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        DeleteOutcome::NotOwned => {
            warn!(%user_id, %id, "category delete denied");
            Err(AppError::Forbidden)
        }
        DeleteOutcome::InUse => Err(AppError::Conflict("category is in use".into())),
    }
}
