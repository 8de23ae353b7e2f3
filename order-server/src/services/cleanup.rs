//! 过期数据清理
//!
//! 文档库的存储级 TTL 在这里表达为一个定时任务：
//! 订单行、两张日账本按 `expire_at` 清理，限流计数按窗口起点清理。

use tokio_util::sync::CancellationToken;

use crate::db::DbService;
use crate::db::repository::{order, point_log};
use shared::util::now_millis;

/// 跑一轮清理，返回删除的总行数
pub async fn sweep_once(db: &DbService) -> u64 {
    let now = now_millis();
    let mut purged = 0u64;

    match order::purge_expired(db.write(), now).await {
        Ok(n) => purged += n,
        Err(e) => tracing::warn!(error = %e, "Failed to purge expired orders"),
    }
    match point_log::purge_expired(db.write(), now).await {
        Ok(n) => purged += n,
        Err(e) => tracing::warn!(error = %e, "Failed to purge expired daily logs"),
    }
    // 限流窗口最长一天，过期计数直接删
    match sqlx::query("DELETE FROM rate_limit WHERE window_start < ?")
        .bind(now - 86_400_000)
        .execute(db.write())
        .await
    {
        Ok(r) => purged += r.rows_affected(),
        Err(e) => tracing::warn!(error = %e, "Failed to purge stale rate-limit windows"),
    }

    if purged > 0 {
        tracing::info!(purged, "TTL sweep removed expired rows");
    }
    purged
}

/// 周期清理循环，由 BackgroundTasks 以 Periodic 任务启动
pub async fn run_sweeper(db: DbService, interval_seconds: u64, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_seconds));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                sweep_once(&db).await;
            }
            _ = shutdown.cancelled() => {
                tracing::debug!("TTL sweeper shutting down");
                return;
            }
        }
    }
}
