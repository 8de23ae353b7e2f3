//! Point Card API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};
use shared::models::{PointCard, RechargeLog};

#[derive(Debug, Deserialize)]
pub struct CreateCardsRequest {
    pub amount: u32,
    pub points: i64,
}

#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub card_id: String,
}

/// POST /api/point-cards - 批量制卡
pub async fn create_cards(
    State(state): State<ServerState>,
    Json(payload): Json<CreateCardsRequest>,
) -> AppResult<Json<Vec<PointCard>>> {
    let cards = state.cards.create_cards(payload.amount, payload.points).await?;
    state.bump_versions(&["point_cards"]);
    Ok(Json(cards))
}

/// GET /api/point-cards/new - 未使用的点卡
pub async fn list_new(State(state): State<ServerState>) -> AppResult<Json<Vec<PointCard>>> {
    Ok(Json(state.cards.list_new().await?))
}

/// GET /api/point-cards/used - 最近使用的点卡
pub async fn list_used(State(state): State<ServerState>) -> AppResult<Json<Vec<PointCard>>> {
    Ok(Json(state.cards.list_used().await?))
}

/// DELETE /api/point-cards/:id - 删除未使用的点卡
pub async fn delete_card(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.cards.delete_card(&id).await?;
    state.bump_versions(&["point_cards"]);
    Ok(Json(ApiResponse::ok()))
}

/// POST /api/restaurants/:restaurant_id/recharge - 点卡兑换充值
pub async fn redeem(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Json(payload): Json<RedeemRequest>,
) -> AppResult<Json<RechargeLog>> {
    let log = state.cards.redeem(&payload.card_id, &restaurant_id).await?;
    // 余额与充值记录都变了，连同对应餐馆一起失效
    state.bump_versions(&[
        "point_cards",
        "restaurants",
        &format!("restaurant:{restaurant_id}"),
        &format!("recharge_logs:{restaurant_id}"),
    ]);
    Ok(Json(log))
}

/// GET /api/restaurants/:restaurant_id/recharge-logs - 充值记录
pub async fn recharge_logs(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
) -> AppResult<Json<Vec<RechargeLog>>> {
    Ok(Json(state.cards.recharge_logs(&restaurant_id).await?))
}
