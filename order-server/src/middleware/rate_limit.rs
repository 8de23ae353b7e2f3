//! 固定窗口限流
//!
//! 计数落在共享存储的 `rate_limit` 表里，多实例部署共用同一份配额，
//! 不再是每个进程各数各的。窗口按 `now - now % window` 对齐。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::core::ServerState;
use crate::utils::{AppError, ErrorCode};
use shared::util::now_millis;

/// 限流层；未启用时直通
pub async fn rate_limit(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let cfg = &state.config;
    if !cfg.rate_limit_enabled {
        return Ok(next.run(req).await);
    }

    let client_key = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "127.0.0.1".to_string());

    let window_ms = i64::from(cfg.rate_limit_window_seconds) * 1000;
    let now = now_millis();
    let window_start = now - now.rem_euclid(window_ms);

    let count: i64 = sqlx::query_scalar(
        "INSERT INTO rate_limit (client_key, window_start, count) VALUES (?1, ?2, 1) \
         ON CONFLICT(client_key, window_start) DO UPDATE SET count = count + 1 \
         RETURNING count",
    )
    .bind(&client_key)
    .bind(window_start)
    .fetch_one(state.db.write())
    .await
    .map_err(|e| AppError::database(e.to_string()))?;

    if count > i64::from(cfg.rate_limit_requests) {
        tracing::warn!(
            client_key,
            count,
            limit = cfg.rate_limit_requests,
            "Too many requests"
        );
        return Err(AppError::new(ErrorCode::RateLimited));
    }

    Ok(next.run(req).await)
}
