//! Daily Ledger API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::point_log;
use crate::utils::AppResult;
use shared::models::{DishOrderLog, PointLog};

/// GET /api/restaurants/:restaurant_id/point-logs - 每日扣点记录
pub async fn point_logs(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
) -> AppResult<Json<Vec<PointLog>>> {
    let rows = point_log::find_point_logs(state.db.read(), &restaurant_id).await?;
    Ok(Json(rows.into_iter().map(PointLog::from).collect()))
}

/// GET /api/restaurants/:restaurant_id/dish-order-logs - 每日菜品销量
pub async fn dish_order_logs(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
) -> AppResult<Json<Vec<DishOrderLog>>> {
    let rows = point_log::find_dish_order_logs(state.db.read(), &restaurant_id).await?;
    let mut logs = Vec::with_capacity(rows.len());
    for row in rows {
        logs.push(row.into_log()?);
    }
    Ok(Json(logs))
}
