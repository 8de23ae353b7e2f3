//! Order Repository (订单与两张日账本)
//!
//! 下单事务的各个写入步骤拆成独立函数，由 ordering 引擎在同一个
//! 事务里按固定顺序调用。

use super::RepoResult;
use shared::models::{OrderItem, PlacedOrderRow};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;

const COLUMNS: &str = "id, restaurant_id, table_id, table_number, items, total, placed_at, \
expire_at, client_request_id";

pub async fn insert(tx: &mut Transaction<'_, Sqlite>, row: &PlacedOrderRow) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO placed_order (id, restaurant_id, table_id, table_number, items, total, \
         placed_at, expire_at, client_request_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(&row.id)
    .bind(&row.restaurant_id)
    .bind(&row.table_id)
    .bind(&row.table_number)
    .bind(&row.items)
    .bind(row.total)
    .bind(row.placed_at)
    .bind(row.expire_at)
    .bind(&row.client_request_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// 幂等查找：同一 client_request_id 的重试直接返回首次下的单
pub async fn find_by_request_id(
    tx: &mut Transaction<'_, Sqlite>,
    restaurant_id: &str,
    client_request_id: &str,
) -> RepoResult<Option<PlacedOrderRow>> {
    let row = sqlx::query_as::<_, PlacedOrderRow>(&format!(
        "SELECT {COLUMNS} FROM placed_order WHERE restaurant_id = ? AND client_request_id = ?"
    ))
    .bind(restaurant_id)
    .bind(client_request_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row)
}

/// 扣点：`points > 0` 守卫写进 WHERE，0 行即余额已耗尽
pub async fn decrement_points(
    tx: &mut Transaction<'_, Sqlite>,
    restaurant_id: &str,
) -> RepoResult<u64> {
    let rows = sqlx::query("UPDATE restaurant SET points = points - 1 WHERE id = ? AND points > 0")
        .bind(restaurant_id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected())
}

/// 点数日志：今日行 count+1 或建行 count=1，TTL 同步刷新
pub async fn upsert_point_log(
    tx: &mut Transaction<'_, Sqlite>,
    restaurant_id: &str,
    date: &str,
    expire_at: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO point_log (restaurant_id, date, count, expire_at) VALUES (?1, ?2, 1, ?3) \
         ON CONFLICT(restaurant_id, date) \
         DO UPDATE SET count = count + 1, expire_at = excluded.expire_at",
    )
    .bind(restaurant_id)
    .bind(date)
    .bind(expire_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// 菜品销量日志：把本单每个菜的数量并入今日 counts JSON
pub async fn upsert_dish_order_log(
    tx: &mut Transaction<'_, Sqlite>,
    restaurant_id: &str,
    date: &str,
    items: &[OrderItem],
    expire_at: i64,
) -> RepoResult<()> {
    let existing: Option<String> = sqlx::query_scalar(
        "SELECT counts FROM dish_order_log WHERE restaurant_id = ? AND date = ?",
    )
    .bind(restaurant_id)
    .bind(date)
    .fetch_optional(&mut **tx)
    .await?;

    let mut counts: HashMap<String, i64> = match existing {
        Some(json) => serde_json::from_str(&json).unwrap_or_default(),
        None => HashMap::new(),
    };
    for item in items {
        *counts.entry(item.dish.id.clone()).or_insert(0) += i64::from(item.quantity);
    }

    sqlx::query(
        "INSERT INTO dish_order_log (restaurant_id, date, counts, expire_at) \
         VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT(restaurant_id, date) \
         DO UPDATE SET counts = excluded.counts, expire_at = excluded.expire_at",
    )
    .bind(restaurant_id)
    .bind(date)
    .bind(serde_json::to_string(&counts)?)
    .bind(expire_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn find_by_id(
    pool: &SqlitePool,
    restaurant_id: &str,
    order_id: &str,
) -> RepoResult<Option<PlacedOrderRow>> {
    let row = sqlx::query_as::<_, PlacedOrderRow>(&format!(
        "SELECT {COLUMNS} FROM placed_order WHERE restaurant_id = ? AND id = ?"
    ))
    .bind(restaurant_id)
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// 厨房显示屏拉取：最近 N 单
pub async fn find_recent(
    pool: &SqlitePool,
    restaurant_id: &str,
    limit: i64,
) -> RepoResult<Vec<PlacedOrderRow>> {
    let rows = sqlx::query_as::<_, PlacedOrderRow>(&format!(
        "SELECT {COLUMNS} FROM placed_order WHERE restaurant_id = ? \
         ORDER BY placed_at DESC LIMIT ?"
    ))
    .bind(restaurant_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// 单行更新（厨房加菜）。绝不触碰点数或日账本。
pub async fn update_items(
    pool: &SqlitePool,
    restaurant_id: &str,
    order_id: &str,
    items_json: &str,
    total: f64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE placed_order SET items = ?1, total = ?2 WHERE restaurant_id = ?3 AND id = ?4",
    )
    .bind(items_json)
    .bind(total)
    .bind(restaurant_id)
    .bind(order_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn purge_expired(pool: &SqlitePool, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM placed_order WHERE expire_at < ?")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
