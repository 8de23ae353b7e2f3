//! Point Card Repository (点卡与充值日志)

use super::{RepoError, RepoResult};
use shared::models::{PointCardRow, RechargeLog};
use shared::util::{new_doc_id, now_millis};
use sqlx::{Sqlite, SqlitePool, Transaction};

const COLUMNS: &str = "id, points, created_at, status, used_by, used_at";

/// 批量制卡，全部 `new` 状态，随机 id 即兑换码
pub async fn insert_many(
    pool: &SqlitePool,
    amount: u32,
    points: i64,
) -> RepoResult<Vec<PointCardRow>> {
    let now = now_millis();
    let mut tx = pool.begin().await?;
    let mut cards = Vec::with_capacity(amount as usize);
    for _ in 0..amount {
        let card = PointCardRow {
            id: new_doc_id(),
            points,
            created_at: now,
            status: "new".to_string(),
            used_by: None,
            used_at: None,
        };
        sqlx::query(
            "INSERT INTO point_card (id, points, created_at, status) VALUES (?1, ?2, ?3, 'new')",
        )
        .bind(&card.id)
        .bind(card.points)
        .bind(card.created_at)
        .execute(&mut *tx)
        .await?;
        cards.push(card);
    }
    tx.commit().await?;
    Ok(cards)
}

pub async fn find_new(pool: &SqlitePool) -> RepoResult<Vec<PointCardRow>> {
    let rows = sqlx::query_as::<_, PointCardRow>(&format!(
        "SELECT {COLUMNS} FROM point_card WHERE status = 'new' ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_used(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<PointCardRow>> {
    let rows = sqlx::query_as::<_, PointCardRow>(&format!(
        "SELECT {COLUMNS} FROM point_card WHERE status = 'used' ORDER BY used_at DESC LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(
    tx: &mut Transaction<'_, Sqlite>,
    card_id: &str,
) -> RepoResult<Option<PointCardRow>> {
    let row = sqlx::query_as::<_, PointCardRow>(&format!(
        "SELECT {COLUMNS} FROM point_card WHERE id = ?"
    ))
    .bind(card_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row)
}

/// CAS 过卡：`status = 'new'` 写进 WHERE，0 行即已被别家兑掉
pub async fn mark_used(
    tx: &mut Transaction<'_, Sqlite>,
    card_id: &str,
    restaurant_id: &str,
    used_at: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE point_card SET status = 'used', used_by = ?1, used_at = ?2 \
         WHERE id = ?3 AND status = 'new'",
    )
    .bind(restaurant_id)
    .bind(used_at)
    .bind(card_id)
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn add_restaurant_points(
    tx: &mut Transaction<'_, Sqlite>,
    restaurant_id: &str,
    points: i64,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE restaurant SET points = points + ? WHERE id = ?")
        .bind(points)
        .bind(restaurant_id)
        .execute(&mut **tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Restaurant {restaurant_id} not found"
        )));
    }
    Ok(())
}

pub async fn insert_recharge_log(
    tx: &mut Transaction<'_, Sqlite>,
    log: &RechargeLog,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO recharge_log (id, restaurant_id, card_id, points_added, recharged_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(&log.id)
    .bind(&log.restaurant_id)
    .bind(&log.card_id)
    .bind(log.points_added)
    .bind(log.recharged_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// 仅 `new` 状态可删；已使用的卡是审计凭据
pub async fn delete_if_new(pool: &SqlitePool, card_id: &str) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM point_card WHERE id = ? AND status = 'new'")
        .bind(card_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn recharge_logs(
    pool: &SqlitePool,
    restaurant_id: &str,
    limit: i64,
) -> RepoResult<Vec<RechargeLog>> {
    let rows = sqlx::query_as::<_, RechargeLog>(
        "SELECT id, restaurant_id, card_id, points_added, recharged_at FROM recharge_log \
         WHERE restaurant_id = ? ORDER BY recharged_at DESC LIMIT ?",
    )
    .bind(restaurant_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
