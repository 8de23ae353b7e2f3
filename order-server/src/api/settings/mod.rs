//! 餐馆设置 API 模块（餐馆管理员）

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurants/{restaurant_id}/settings", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_settings))
        .route("/", put(handler::update_general))
        .route("/sync", put(handler::update_sync))
        .route("/category-order", put(handler::update_category_order))
        .route("/password", put(handler::update_password))
        .layer(middleware::from_fn(require_admin))
}
