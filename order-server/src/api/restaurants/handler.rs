//! Restaurant API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::restaurant;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::Restaurant;

#[derive(Debug, Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameRestaurantRequest {
    pub name: String,
}

/// GET /api/restaurants - 获取所有餐馆
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Restaurant>>> {
    let rows = restaurant::find_all(state.db.read()).await?;
    Ok(Json(rows.into_iter().map(Restaurant::from).collect()))
}

/// POST /api/restaurants - 创建餐馆（附带默认设置和初始点数）
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateRestaurantRequest>,
) -> AppResult<Json<Restaurant>> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RestaurantNameEmpty,
            "餐馆名称不能为空。",
        ));
    }

    let row = restaurant::create(state.db.write(), name).await?;
    tracing::info!(restaurant_id = %row.id, name = %row.name, "Restaurant created");
    state.bump_versions(&["restaurants"]);
    Ok(Json(Restaurant::from(row)))
}

/// PUT /api/restaurants/:id/name - 重命名餐馆
pub async fn rename(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RenameRestaurantRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RestaurantNameEmpty,
            "餐馆名称不能为空。",
        ));
    }

    restaurant::rename(state.db.write(), &id, name).await?;
    state.bump_versions(&["restaurants"]);
    Ok(Json(ApiResponse::ok()))
}

/// DELETE /api/restaurants/:id - 删除餐馆（级联删除全部数据）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let deleted = restaurant::delete(state.db.write(), &id).await?;
    if !deleted {
        return Err(AppError::with_message(
            ErrorCode::RestaurantNotFound,
            "餐馆不存在。",
        ));
    }
    state.settings.invalidate(&id);
    tracing::info!(restaurant_id = %id, "Restaurant deleted");
    state.bump_versions(&[
        "restaurants",
        &format!("dishes:{id}"),
        &format!("orders:{id}"),
        &format!("settings:{id}"),
    ]);
    Ok(Json(ApiResponse::ok()))
}

/// POST /api/restaurants/:id/clear-data - 清空业务数据并重置设置
pub async fn clear_data(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    restaurant::find_by_id(state.db.read(), &id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::RestaurantNotFound, "餐馆不存在。"))?;

    restaurant::clear_data(state.db.write(), &id).await?;
    state.settings.invalidate(&id);
    tracing::info!(restaurant_id = %id, "Restaurant data cleared");
    state.bump_versions(&[
        &format!("dishes:{id}"),
        &format!("orders:{id}"),
        &format!("settings:{id}"),
    ]);
    Ok(Json(ApiResponse::ok()))
}
