//! Daily Ledger Repository (点数日志 / 菜品销量日志 只读查询与过期清理)

use super::RepoResult;
use shared::models::{DishOrderLogRow, PointLogRow};
use sqlx::SqlitePool;

pub async fn find_point_logs(
    pool: &SqlitePool,
    restaurant_id: &str,
) -> RepoResult<Vec<PointLogRow>> {
    let rows = sqlx::query_as::<_, PointLogRow>(
        "SELECT restaurant_id, date, count, expire_at FROM point_log \
         WHERE restaurant_id = ? ORDER BY date DESC",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_dish_order_logs(
    pool: &SqlitePool,
    restaurant_id: &str,
) -> RepoResult<Vec<DishOrderLogRow>> {
    let rows = sqlx::query_as::<_, DishOrderLogRow>(
        "SELECT restaurant_id, date, counts, expire_at FROM dish_order_log \
         WHERE restaurant_id = ? ORDER BY date DESC",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn purge_expired(pool: &SqlitePool, now: i64) -> RepoResult<u64> {
    let point = sqlx::query("DELETE FROM point_log WHERE expire_at < ?")
        .bind(now)
        .execute(pool)
        .await?;
    let dish = sqlx::query("DELETE FROM dish_order_log WHERE expire_at < ?")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(point.rows_affected() + dish.rows_affected())
}
