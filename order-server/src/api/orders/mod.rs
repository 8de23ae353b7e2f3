//! 下单与厨房订单 API 模块
//!
//! 下单和订单追加来自扫码点餐页，不要求会话；
//! 厨房拉单在餐馆设置了厨房密码时要求厨房（或管理员）会话。

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders", post(handler::place_order))
        .route(
            "/api/restaurants/{restaurant_id}/orders",
            get(handler::list_recent),
        )
        .route(
            "/api/restaurants/{restaurant_id}/orders/{order_id}",
            put(handler::update_order),
        )
}
