//! Category API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate};
use crate::db::repository::CategoryRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/categories - all active categories
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/categories/:slug - one category with its direct children
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category '{}' not found", slug)))?;
    Ok(Json(category))
}

/// POST /api/categories - create a category
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.db.clone());
    Ok(Json(repo.create(payload).await?))
}
