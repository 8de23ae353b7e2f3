//! 下单/改单引擎
//!
//! `place_order` 的前置检查顺序是固定契约：缺餐馆信息 → 空订单 →
//! [事务] 餐馆存在 → 点数充足 → 手动打烊 → 线上点单关闭 → 自动打烊时段。
//! 手动打烊优先于时段判断，闭店状态下永远不报"休息时间"。
//!
//! 两个入口都不返回 `Err`：业务拒绝与基础设施故障都装进
//! [`PlaceOrderResult`]，由 `error_code` 区分（客户端只在 9xxx 时启用
//! 本地账本兜底）。

use chrono_tz::Tz;

use crate::db::DbService;
use crate::db::repository::{RepoError, order, restaurant};
use crate::ordering::hours;
use crate::services::SettingsService;
use crate::utils::ErrorCode;
use crate::utils::time::{current_minute_of_day, millis_after_days, today_date_key};
use shared::models::{AppSettings, PlaceOrderInput, PlaceOrderResult, PlacedOrderRow};
use shared::util::{new_doc_id, now_millis};

/// 订单行 TTL
const ORDER_TTL_DAYS: i64 = 30;
/// 点数日志 TTL（每次触达刷新）
const POINT_LOG_TTL_DAYS: i64 = 90;
/// 菜品销量日志 TTL（有意短于点数日志）
const DISH_LOG_TTL_DAYS: i64 = 30;

#[derive(Clone)]
pub struct OrderEngine {
    db: DbService,
    settings: SettingsService,
    tz: Tz,
}

impl OrderEngine {
    pub fn new(db: DbService, settings: SettingsService, tz: Tz) -> Self {
        Self { db, settings, tz }
    }

    /// 下单。检查全过后，订单插入、扣点、两张日账本在同一事务内
    /// 全部落盘或全部回滚。
    pub async fn place_order(&self, input: PlaceOrderInput) -> PlaceOrderResult {
        if input.restaurant_id.is_empty() {
            return PlaceOrderResult::rejected(
                ErrorCode::RestaurantMissing,
                "下单失败，缺少餐馆信息。",
                "[SERVER] Order rejected: Missing restaurant id.",
            );
        }
        if input.order.is_empty() {
            return PlaceOrderResult::rejected(
                ErrorCode::OrderEmpty,
                "下单失败，订单为空。",
                "[SERVER] Order rejected: Empty order.",
            );
        }

        // 设置在事务外读取（解析器带缓存）；接受这一点读偏差
        let settings = match self.settings.get(&input.restaurant_id).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(restaurant_id = %input.restaurant_id, error = %e,
                    "place_order: failed to load settings");
                return PlaceOrderResult::critical(
                    format!("下单时发生严重服务器错误: {e}"),
                    format!("[SERVER] CRITICAL: Exception in place_order: {e}"),
                );
            }
        };

        match self.try_place(&input, &settings).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(restaurant_id = %input.restaurant_id, error = %e,
                    "CRITICAL: unhandled failure in place_order");
                PlaceOrderResult::critical(
                    format!("下单时发生严重服务器错误: {e}"),
                    format!("[SERVER] CRITICAL: Exception in place_order: {e}"),
                )
            }
        }
    }

    async fn try_place(
        &self,
        input: &PlaceOrderInput,
        settings: &AppSettings,
    ) -> Result<PlaceOrderResult, RepoError> {
        let mut tx = self.db.write().begin().await?;

        // 幂等重放：同一 client_request_id 直接返回首次下的单
        if let Some(request_id) = &input.client_request_id
            && let Some(existing) =
                order::find_by_request_id(&mut tx, &input.restaurant_id, request_id).await?
        {
            tx.rollback().await?;
            let placed = existing.into_order()?;
            return Ok(PlaceOrderResult::success(
                placed,
                "[SERVER] Duplicate request, returning the original order.",
            ));
        }

        let Some(restaurant) = restaurant::find_in_tx(&mut tx, &input.restaurant_id).await? else {
            return Ok(PlaceOrderResult::rejected(
                ErrorCode::RestaurantNotFound,
                "餐馆不存在。",
                "[SERVER] Order rejected: Restaurant not found.",
            ));
        };
        if restaurant.points <= 0 {
            return Ok(PlaceOrderResult::rejected(
                ErrorCode::InsufficientPoints,
                "点数不足，请联系管理员充值。",
                "[SERVER] Order rejected: Insufficient points.",
            ));
        }

        if settings.is_restaurant_closed {
            return Ok(PlaceOrderResult::rejected(
                ErrorCode::RestaurantClosed,
                "抱歉，本店已打烊，暂时无法下单。",
                "[SERVER] Order rejected: Restaurant is manually closed.",
            ));
        }
        if settings.is_online_ordering_disabled {
            return Ok(PlaceOrderResult::rejected(
                ErrorCode::OnlineOrderingDisabled,
                "线上点单已经关闭，仅支持线下点单",
                "[SERVER] Order rejected: Online ordering is disabled.",
            ));
        }
        if hours::is_within_window(
            &settings.auto_close_start_time,
            &settings.auto_close_end_time,
            current_minute_of_day(self.tz),
        ) {
            return Ok(PlaceOrderResult::rejected(
                ErrorCode::OutsideOrderingHours,
                format!(
                    "抱歉，现在是休息时间 ({} - {})，暂时无法下单。",
                    settings.auto_close_start_time, settings.auto_close_end_time
                ),
                "[SERVER] Order rejected: Within automatic closing hours.",
            ));
        }

        let now = now_millis();
        let date = today_date_key(self.tz);
        let row = PlacedOrderRow {
            id: new_doc_id(),
            restaurant_id: input.restaurant_id.clone(),
            table_id: input.table_id.clone(),
            table_number: input.table_number.clone(),
            items: serde_json::to_string(&input.order)?,
            total: input.total,
            placed_at: now,
            expire_at: millis_after_days(ORDER_TTL_DAYS),
            client_request_id: input.client_request_id.clone(),
        };

        order::insert(&mut tx, &row).await?;
        // WHERE points > 0 守卫；写池单连接下读写之间无人插队，
        // 0 行仍按余额耗尽处理，丢弃事务即回滚前面的插入
        let charged = order::decrement_points(&mut tx, &input.restaurant_id).await?;
        if charged == 0 {
            return Ok(PlaceOrderResult::rejected(
                ErrorCode::InsufficientPoints,
                "点数不足，请联系管理员充值。",
                "[SERVER] Order rejected: Insufficient points.",
            ));
        }
        order::upsert_point_log(
            &mut tx,
            &input.restaurant_id,
            &date,
            millis_after_days(POINT_LOG_TTL_DAYS),
        )
        .await?;
        order::upsert_dish_order_log(
            &mut tx,
            &input.restaurant_id,
            &date,
            &input.order,
            millis_after_days(DISH_LOG_TTL_DAYS),
        )
        .await?;
        tx.commit().await?;

        let placed = row.into_order()?;
        Ok(PlaceOrderResult::success(
            placed,
            "[SERVER] Order placed successfully.",
        ))
    }

    /// 改单（厨房加菜）：单行更新，绝不触碰点数或日账本。
    /// 一单一点在下单时已结清，后加的菜不再计数。
    pub async fn update_order(
        &self,
        restaurant_id: &str,
        order_id: &str,
        items: &[shared::models::OrderItem],
        total: f64,
    ) -> PlaceOrderResult {
        if restaurant_id.is_empty() {
            return PlaceOrderResult::rejected(
                ErrorCode::RestaurantMissing,
                "更新失败，缺少餐馆信息。",
                "[SERVER] Update rejected: Missing restaurant id.",
            );
        }

        match self.try_update(restaurant_id, order_id, items, total).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(restaurant_id, order_id, error = %e,
                    "CRITICAL: unhandled failure in update_order");
                PlaceOrderResult::critical(
                    format!(
                        "A critical server error occurred while updating the order. Details: {e}"
                    ),
                    format!("[SERVER] CRITICAL: Exception in update_order: {e}"),
                )
            }
        }
    }

    async fn try_update(
        &self,
        restaurant_id: &str,
        order_id: &str,
        items: &[shared::models::OrderItem],
        total: f64,
    ) -> Result<PlaceOrderResult, RepoError> {
        let items_json = serde_json::to_string(items)?;
        let affected =
            order::update_items(self.db.write(), restaurant_id, order_id, &items_json, total)
                .await?;
        if affected == 0 {
            return Ok(PlaceOrderResult::rejected(
                ErrorCode::OrderNotFound,
                format!("更新失败：订单 {order_id} 不存在。"),
                format!("[SERVER] Update rejected: Order {order_id} not found."),
            ));
        }

        let row = order::find_by_id(self.db.read(), restaurant_id, order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} vanished after update")))?;
        let updated = row.into_order()?;
        Ok(PlaceOrderResult::success(
            updated,
            format!("[SERVER] Order {order_id} updated successfully."),
        ))
    }
}
