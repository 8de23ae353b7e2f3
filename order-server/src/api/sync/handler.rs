//! Sync API Handlers

use axum::{Json, extract::State};
use std::collections::HashMap;

use crate::core::ServerState;

/// GET /api/sync/versions - 所有资源的当前版本号
pub async fn versions(State(state): State<ServerState>) -> Json<HashMap<String, u64>> {
    Json(state.resource_versions.snapshot())
}
