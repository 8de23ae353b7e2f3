//! 餐馆管理 API 模块（超级管理员）

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_super;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurants", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/", post(handler::create))
        .route("/{id}/name", put(handler::rename))
        .route("/{id}", delete(handler::delete))
        .route("/{id}/clear-data", post(handler::clear_data))
        .layer(middleware::from_fn(require_super))
}
