//! 认证 API 模块
//!
//! 三种会话：餐馆管理员、超级管理员、厨房显示端。

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::admin_login))
        .route("/super", post(handler::super_login))
        .route("/kitchen", post(handler::kitchen_login))
}
