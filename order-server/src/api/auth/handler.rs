//! Auth API Handlers
//!
//! 口令校验成功后签发 JWT；错误一律返回「账号或密码错误」不泄露细节。

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::core::ServerState;
use crate::db::repository::restaurant;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub restaurant_id: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SuperLoginRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct KitchenLoginRequest {
    pub restaurant_id: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub expires_in_minutes: i64,
}

/// POST /api/auth/login - 餐馆管理员登录
pub async fn admin_login(
    State(state): State<ServerState>,
    Json(payload): Json<AdminLoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    restaurant::find_by_id(state.db.read(), &payload.restaurant_id)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let settings = state.settings.get(&payload.restaurant_id).await?;
    if payload.username != settings.admin_username || payload.password != settings.admin_password {
        tracing::warn!(restaurant_id = %payload.restaurant_id, "Admin login rejected");
        return Err(AppError::invalid_credentials());
    }

    issue(&state, &payload.restaurant_id, Role::Admin)
}

/// POST /api/auth/super - 超级管理员登录
pub async fn super_login(
    State(state): State<ServerState>,
    Json(payload): Json<SuperLoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if payload.password != state.config.super_admin_password {
        tracing::warn!("Super admin login rejected");
        return Err(AppError::invalid_credentials());
    }
    issue(&state, "super", Role::Super)
}

/// POST /api/auth/kitchen - 厨房显示端登录
///
/// 餐馆未设置厨房密码时任何人都可以取得厨房会话。
pub async fn kitchen_login(
    State(state): State<ServerState>,
    Json(payload): Json<KitchenLoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    restaurant::find_by_id(state.db.read(), &payload.restaurant_id)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let settings = state.settings.get(&payload.restaurant_id).await?;
    if !settings.kitchen_display_password.is_empty()
        && payload.password != settings.kitchen_display_password
    {
        tracing::warn!(restaurant_id = %payload.restaurant_id, "Kitchen login rejected");
        return Err(AppError::invalid_credentials());
    }

    issue(&state, &payload.restaurant_id, Role::Kitchen)
}

fn issue(state: &ServerState, subject: &str, role: Role) -> AppResult<Json<LoginResponse>> {
    let token = state
        .jwt_service
        .generate_token(subject, role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;
    Ok(Json(LoginResponse {
        token,
        role,
        expires_in_minutes: state.jwt_service.config.expiration_minutes,
    }))
}
