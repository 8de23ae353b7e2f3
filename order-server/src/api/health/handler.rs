//! Health API Handlers

use axum::{Json, extract::State};
use serde::Serialize;
use std::time::SystemTime;

use crate::core::ServerState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub uptime_seconds: u64,
}

// 服务器启动时间 (懒加载静态变量)
static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

fn get_uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// GET /api/health - 基础健康检查
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(state.db.read()).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::error!(error = %e, "Health check database query failed");
            "error"
        }
    };

    Json(HealthResponse {
        status: "ok",
        database,
        uptime_seconds: get_uptime_seconds(),
    })
}
