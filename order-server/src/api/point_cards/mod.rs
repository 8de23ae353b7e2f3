//! 点卡 API 模块
//!
//! 制卡 / 删卡 / 列表归超级管理员；充值（兑换）归餐馆管理员。

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::{require_admin, require_super};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let super_routes = Router::new()
        .route("/api/point-cards", post(handler::create_cards))
        .route("/api/point-cards/new", get(handler::list_new))
        .route("/api/point-cards/used", get(handler::list_used))
        .route("/api/point-cards/{id}", delete(handler::delete_card))
        .layer(middleware::from_fn(require_super));

    let admin_routes = Router::new()
        .route(
            "/api/restaurants/{restaurant_id}/recharge",
            post(handler::redeem),
        )
        .route(
            "/api/restaurants/{restaurant_id}/recharge-logs",
            get(handler::recharge_logs),
        )
        .layer(middleware::from_fn(require_admin));

    super_routes.merge(admin_routes)
}
