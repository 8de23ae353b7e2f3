//! 资源版本轮询 API 模块
//!
//! 客户端轮询版本号，变化即重新拉取对应资源。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/sync/versions", get(handler::versions))
}
