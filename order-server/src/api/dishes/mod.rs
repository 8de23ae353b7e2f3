//! 菜品管理 API 模块
//!
//! 菜单读取对点餐页公开，写操作要求餐馆管理员。

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurants/{restaurant_id}/dishes", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new().route("/", get(handler::list));

    let write_routes = Router::new()
        .route("/", post(handler::create))
        .route("/batch", post(handler::batch_upsert))
        .route("/{id}", put(handler::update))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(write_routes)
}
