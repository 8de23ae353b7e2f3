//! Order API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{PlaceOrderInput, PlaceOrderResult, PlacedOrder, UpdateOrderInput};

#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub limit: Option<u32>,
}

/// POST /api/orders - 扫码点餐下单
///
/// 业务拒绝也返回 200，结果体里带 `error` 和 `error_code`；
/// 只有传输层故障才是 HTTP 错误。
pub async fn place_order(
    State(state): State<ServerState>,
    Json(payload): Json<PlaceOrderInput>,
) -> Json<PlaceOrderResult> {
    let result = state.orders.place_order(payload).await;
    if let Some(order) = result.order.as_ref().filter(|_| result.error.is_none()) {
        // 点数与两张日账本都动了，连带失效对应的缓存
        let rid = &order.restaurant_id;
        state.bump_versions(&[
            "restaurants",
            &format!("restaurant:{rid}"),
            &format!("orders:{rid}"),
            &format!("point_logs:{rid}"),
            &format!("dish_order_logs:{rid}"),
        ]);
    }
    Json(result)
}

/// PUT /api/restaurants/:restaurant_id/orders/:order_id - 追加菜品
pub async fn update_order(
    State(state): State<ServerState>,
    Path((restaurant_id, order_id)): Path<(String, String)>,
    Json(payload): Json<UpdateOrderInput>,
) -> Json<PlaceOrderResult> {
    let result = state
        .orders
        .update_order(&restaurant_id, &order_id, &payload.order, payload.total)
        .await;
    if result.error.is_none() {
        state.bump_versions(&[&format!("orders:{restaurant_id}")]);
    }
    Json(result)
}

/// GET /api/restaurants/:restaurant_id/orders?limit=N - 厨房拉单
///
/// limit 缺省取餐馆设置的 `sync_order_count`。
pub async fn list_recent(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Query(query): Query<ListOrdersQuery>,
    user: Option<Extension<CurrentUser>>,
) -> AppResult<Json<Vec<PlacedOrder>>> {
    let settings = state.settings.get(&restaurant_id).await?;

    // 设了厨房密码的餐馆才要求会话
    if !settings.kitchen_display_password.is_empty() {
        let allowed = user
            .as_ref()
            .map(|Extension(u)| u.can_view_kitchen(&restaurant_id))
            .unwrap_or(false);
        if !allowed {
            return Err(AppError::new(ErrorCode::KitchenSessionRequired));
        }
    }

    let limit = query.limit.unwrap_or(settings.sync_order_count).min(200) as i64;
    let rows = order::find_recent(state.db.read(), &restaurant_id, limit).await?;
    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        orders.push(row.into_order()?);
    }
    Ok(Json(orders))
}
