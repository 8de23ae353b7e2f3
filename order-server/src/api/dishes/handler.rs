//! Dish API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::dish;
use crate::utils::{ApiResponse, AppError, AppResult};
use shared::models::{Dish, DishBatchEntry, DishCreate, DishUpdate};

/// GET /api/restaurants/:restaurant_id/dishes - 获取菜单
pub async fn list(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
) -> AppResult<Json<Vec<Dish>>> {
    let dishes = dish::find_all(state.db.read(), &restaurant_id).await?;
    Ok(Json(dishes))
}

/// POST /api/restaurants/:restaurant_id/dishes - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Json(payload): Json<DishCreate>,
) -> AppResult<Json<Dish>> {
    let created = dish::create(state.db.write(), &restaurant_id, payload).await?;
    state.bump_versions(&[&format!("dishes:{restaurant_id}")]);
    Ok(Json(created))
}

/// PUT /api/restaurants/:restaurant_id/dishes/:id - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(String, String)>,
    Json(payload): Json<DishUpdate>,
) -> AppResult<Json<Dish>> {
    let updated = dish::update(state.db.write(), &restaurant_id, &id, payload).await?;
    state.bump_versions(&[&format!("dishes:{restaurant_id}")]);
    Ok(Json(updated))
}

/// DELETE /api/restaurants/:restaurant_id/dishes/:id - 删除菜品
pub async fn delete(
    State(state): State<ServerState>,
    Path((restaurant_id, id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<()>>> {
    let deleted = dish::delete(state.db.write(), &restaurant_id, &id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("菜品 {id} 不存在。")));
    }
    state.bump_versions(&[&format!("dishes:{restaurant_id}")]);
    Ok(Json(ApiResponse::ok()))
}

#[derive(Debug, Serialize)]
pub struct BatchUpsertResponse {
    pub applied: usize,
}

/// POST /api/restaurants/:restaurant_id/dishes/batch - 批量导入/改名
pub async fn batch_upsert(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Json(payload): Json<Vec<DishBatchEntry>>,
) -> AppResult<Json<BatchUpsertResponse>> {
    let applied = dish::batch_upsert(state.db.write(), &restaurant_id, payload).await?;
    tracing::info!(restaurant_id = %restaurant_id, applied, "Dish batch upsert applied");
    state.bump_versions(&[&format!("dishes:{restaurant_id}")]);
    Ok(Json(BatchUpsertResponse { applied }))
}
