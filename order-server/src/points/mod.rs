//! 点卡服务 (Point-Card Redemption)
//!
//! 过卡是一次性的：`new → used` 的状态迁移由 CAS 守卫
//! (`WHERE status = 'new'`) 与单连接写池共同保证恰好发生一次。

use crate::db::DbService;
use crate::db::repository::point_card as card_repo;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{PointCard, RechargeLog};
use shared::util::{millis_to_iso, new_doc_id, now_millis};

#[derive(Clone)]
pub struct CardService {
    db: DbService,
}

impl CardService {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// 批量制卡（超级管理员）
    pub async fn create_cards(&self, amount: u32, points: i64) -> AppResult<Vec<PointCard>> {
        if amount == 0 || amount > 500 {
            return Err(AppError::validation("制卡数量必须在 1 到 500 之间。"));
        }
        if points <= 0 {
            return Err(AppError::with_message(
                ErrorCode::CardPointsInvalid,
                "点卡面值必须是正数。",
            ));
        }
        let rows = card_repo::insert_many(self.db.write(), amount, points).await?;
        Ok(rows.into_iter().map(PointCard::from).collect())
    }

    /// 兑换：加点、过卡、记账三笔写入同一事务，全成或全不成
    pub async fn redeem(&self, card_id: &str, restaurant_id: &str) -> AppResult<RechargeLog> {
        if card_id.is_empty() {
            return Err(AppError::validation("点卡代码不能为空。"));
        }
        let mut tx = self
            .db
            .write()
            .begin()
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        let Some(card) = card_repo::find_by_id(&mut tx, card_id).await? else {
            return Err(AppError::with_message(
                ErrorCode::CardNotFound,
                "点卡代码无效或不存在。",
            ));
        };
        if card.status == "used" {
            let used_by = card.used_by.as_deref().unwrap_or("?");
            let used_at = card.used_at.map(millis_to_iso).unwrap_or_default();
            return Err(AppError::with_message(
                ErrorCode::CardAlreadyUsed,
                format!("此点卡已被餐馆 {used_by} 于 {used_at} 使用。"),
            ));
        }

        let now = now_millis();
        card_repo::add_restaurant_points(&mut tx, restaurant_id, card.points).await?;
        // 读取与此处的 CAS 之间写池无并发，0 行仍按已用处理
        let claimed = card_repo::mark_used(&mut tx, card_id, restaurant_id, now).await?;
        if claimed == 0 {
            return Err(AppError::with_message(
                ErrorCode::CardAlreadyUsed,
                "此点卡已被使用。",
            ));
        }
        let log = RechargeLog {
            id: new_doc_id(),
            restaurant_id: restaurant_id.to_string(),
            card_id: card_id.to_string(),
            points_added: card.points,
            recharged_at: now,
        };
        card_repo::insert_recharge_log(&mut tx, &log).await?;
        tx.commit()
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        tracing::info!(card_id, restaurant_id, points = card.points, "Point card redeemed");
        Ok(log)
    }

    /// 删卡：仅未使用的卡可删
    pub async fn delete_card(&self, card_id: &str) -> AppResult<()> {
        let deleted = card_repo::delete_if_new(self.db.write(), card_id).await?;
        if deleted == 0 {
            // 分辨"不存在"与"已使用"
            let mut tx = self
                .db
                .write()
                .begin()
                .await
                .map_err(|e| AppError::database(e.to_string()))?;
            let card = card_repo::find_by_id(&mut tx, card_id).await?;
            return Err(match card {
                Some(_) => {
                    AppError::with_message(ErrorCode::CardUsedCannotDelete, "不能删除已使用的点卡。")
                }
                None => AppError::with_message(ErrorCode::CardNotFound, "点卡不存在。"),
            });
        }
        Ok(())
    }

    /// 未使用的卡（全部，建新在前）
    pub async fn list_new(&self) -> AppResult<Vec<PointCard>> {
        let rows = card_repo::find_new(self.db.read()).await?;
        Ok(rows.into_iter().map(PointCard::from).collect())
    }

    /// 已使用的卡（最近 50 张）
    pub async fn list_used(&self) -> AppResult<Vec<PointCard>> {
        let rows = card_repo::find_used(self.db.read(), 50).await?;
        Ok(rows.into_iter().map(PointCard::from).collect())
    }

    /// 某餐馆的充值记录（最近 50 条）
    pub async fn recharge_logs(&self, restaurant_id: &str) -> AppResult<Vec<RechargeLog>> {
        Ok(card_repo::recharge_logs(self.db.read(), restaurant_id, 50).await?)
    }
}
