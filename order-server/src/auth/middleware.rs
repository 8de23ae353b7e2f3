//! 认证中间件
//!
//! `authenticate` 全局解析令牌并注入 [`CurrentUser`]，匿名请求放行；
//! 各资源路由再按需叠加 `require_*` 守卫。

use std::collections::HashMap;

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::utils::{AppError, ErrorCode};

/// 全局认证层：有令牌则验证并注入用户，无令牌放行
///
/// 坏令牌立即 401，不会降级成匿名——客户端应当知道自己的会话失效了。
pub async fn authenticate(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    if let Some(header) = auth_header {
        let token = JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;
        match state.jwt_service.validate_token(token) {
            Ok(claims) => {
                req.extensions_mut().insert(CurrentUser::from(claims));
            }
            Err(crate::auth::JwtError::ExpiredToken) => return Err(AppError::token_expired()),
            Err(e) => {
                tracing::warn!(error = %e, uri = %req.uri(), "auth_failed");
                return Err(AppError::invalid_token("Invalid token"));
            }
        }
    }

    Ok(next.run(req).await)
}

/// 守卫：超级管理员
pub async fn require_super(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;
    if !user.is_super() {
        return Err(AppError::new(ErrorCode::SuperAdminRequired));
    }
    Ok(next.run(req).await)
}

/// 守卫：餐馆管理员（或超级管理员）
///
/// 路径里带 `{id}` / `{restaurant_id}` 时校验会话属于该餐馆。
pub async fn require_admin(
    Path(params): Path<HashMap<String, String>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;

    let scoped = params
        .get("restaurant_id")
        .or_else(|| params.get("id"))
        .cloned();
    match scoped {
        Some(restaurant_id) if !user.can_manage(&restaurant_id) => {
            tracing::warn!(restaurant_id, role = ?user.role, "admin scope denied");
            Err(AppError::new(ErrorCode::AdminRequired))
        }
        None if user.role == crate::auth::Role::Kitchen => {
            Err(AppError::new(ErrorCode::AdminRequired))
        }
        _ => Ok(next.run(req).await),
    }
}
