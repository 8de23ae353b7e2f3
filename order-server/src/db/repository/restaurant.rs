//! Restaurant Repository (租户)

use super::{RepoError, RepoResult, settings};
use shared::models::RestaurantRow;
use shared::util::{new_doc_id, now_millis};
use sqlx::{Sqlite, SqlitePool, Transaction};

/// 新建餐馆的初始点数
const STARTING_POINTS: i64 = 1000;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<RestaurantRow>> {
    let rows = sqlx::query_as::<_, RestaurantRow>(
        "SELECT id, name, created_at, points FROM restaurant ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<RestaurantRow>> {
    let row = sqlx::query_as::<_, RestaurantRow>(
        "SELECT id, name, created_at, points FROM restaurant WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// 事务内读取（下单引擎的余额检查走这里）
pub async fn find_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: &str,
) -> RepoResult<Option<RestaurantRow>> {
    let row = sqlx::query_as::<_, RestaurantRow>(
        "SELECT id, name, created_at, points FROM restaurant WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row)
}

/// 创建餐馆：餐馆行 + 默认设置行，同一事务
pub async fn create(pool: &SqlitePool, name: &str) -> RepoResult<RestaurantRow> {
    let id = new_doc_id();
    let now = now_millis();

    let mut tx = pool.begin().await?;
    sqlx::query("INSERT INTO restaurant (id, name, created_at, points) VALUES (?1, ?2, ?3, ?4)")
        .bind(&id)
        .bind(name)
        .bind(now)
        .bind(STARTING_POINTS)
        .execute(&mut *tx)
        .await?;
    settings::insert_defaults(&mut tx, &id).await?;
    tx.commit().await?;

    Ok(RestaurantRow {
        id,
        name: name.to_string(),
        created_at: now,
        points: STARTING_POINTS,
    })
}

pub async fn rename(pool: &SqlitePool, id: &str, name: &str) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE restaurant SET name = ? WHERE id = ?")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Restaurant {id} not found")));
    }
    Ok(())
}

/// 删除餐馆；子表由外键级联清理
pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM restaurant WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// 清空业务数据（菜品、订单、日志），设置恢复默认，餐馆与点数保留
pub async fn clear_data(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let mut tx = pool.begin().await?;
    for table in [
        "dish",
        "placed_order",
        "point_log",
        "dish_order_log",
        "recharge_log",
    ] {
        sqlx::query(&format!("DELETE FROM {table} WHERE restaurant_id = ?"))
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    sqlx::query("DELETE FROM app_settings WHERE restaurant_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    settings::insert_defaults(&mut tx, id).await?;
    tx.commit().await?;
    Ok(())
}
