//! 日账本 API 模块（餐馆管理员仪表盘读取）

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/restaurants/{restaurant_id}/point-logs",
            get(handler::point_logs),
        )
        .route(
            "/api/restaurants/{restaurant_id}/dish-order-logs",
            get(handler::dish_order_logs),
        )
        .layer(middleware::from_fn(require_admin))
}
