//! Settings API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};
use shared::models::{AppSettings, SettingsUpdate, SyncSettingsUpdate};

#[derive(Debug, Deserialize)]
pub struct CategoryOrderRequest {
    pub category_order: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub new_username: Option<String>,
}

/// GET /api/restaurants/:restaurant_id/settings - 获取设置
pub async fn get_settings(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
) -> AppResult<Json<AppSettings>> {
    let settings = state.settings.get(&restaurant_id).await?;
    Ok(Json(settings))
}

/// PUT /api/restaurants/:restaurant_id/settings - 更新常规设置
pub async fn update_general(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Json(payload): Json<SettingsUpdate>,
) -> AppResult<Json<AppSettings>> {
    let settings = state.settings.update_general(&restaurant_id, payload).await?;
    state.bump_versions(&[&format!("settings:{restaurant_id}")]);
    Ok(Json(settings))
}

/// PUT /api/restaurants/:restaurant_id/settings/sync - 更新同步设置
pub async fn update_sync(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Json(payload): Json<SyncSettingsUpdate>,
) -> AppResult<Json<AppSettings>> {
    let settings = state.settings.update_sync(&restaurant_id, payload).await?;
    state.bump_versions(&[&format!("settings:{restaurant_id}")]);
    Ok(Json(settings))
}

/// PUT /api/restaurants/:restaurant_id/settings/category-order - 分类排序
pub async fn update_category_order(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Json(payload): Json<CategoryOrderRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .settings
        .update_category_order(&restaurant_id, &payload.category_order)
        .await?;
    state.bump_versions(&[&format!("settings:{restaurant_id}")]);
    Ok(Json(ApiResponse::ok()))
}

/// PUT /api/restaurants/:restaurant_id/settings/password - 修改管理员密码
pub async fn update_password(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .settings
        .update_admin_password(
            &restaurant_id,
            &payload.current_password,
            &payload.new_password,
            payload.new_username.as_deref(),
        )
        .await?;
    tracing::info!(restaurant_id = %restaurant_id, "Admin password changed");
    Ok(Json(ApiResponse::success_with_message("密码修改成功。", ())))
}
