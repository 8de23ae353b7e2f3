//! Dish Repository (菜品)

use super::{RepoError, RepoResult};
use shared::models::{Dish, DishBatchEntry, DishCreate, DishUpdate};
use shared::util::new_doc_id;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, restaurant_id, name, price, category, sort_order, is_recommended";

pub async fn find_all(pool: &SqlitePool, restaurant_id: &str) -> RepoResult<Vec<Dish>> {
    let rows = sqlx::query_as::<_, Dish>(&format!(
        "SELECT {COLUMNS} FROM dish WHERE restaurant_id = ? ORDER BY sort_order, name"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(
    pool: &SqlitePool,
    restaurant_id: &str,
    id: &str,
) -> RepoResult<Option<Dish>> {
    let row = sqlx::query_as::<_, Dish>(&format!(
        "SELECT {COLUMNS} FROM dish WHERE restaurant_id = ? AND id = ?"
    ))
    .bind(restaurant_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, restaurant_id: &str, data: DishCreate) -> RepoResult<Dish> {
    if data.price <= 0.0 {
        return Err(RepoError::Validation("价格必须大于0".into()));
    }
    let dish = Dish {
        id: new_doc_id(),
        restaurant_id: restaurant_id.to_string(),
        name: data.name,
        price: data.price,
        category: data.category,
        sort_order: data.sort_order,
        is_recommended: data.is_recommended,
    };
    sqlx::query(
        "INSERT INTO dish (id, restaurant_id, name, price, category, sort_order, is_recommended) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&dish.id)
    .bind(&dish.restaurant_id)
    .bind(&dish.name)
    .bind(dish.price)
    .bind(&dish.category)
    .bind(dish.sort_order)
    .bind(dish.is_recommended)
    .execute(pool)
    .await?;
    Ok(dish)
}

pub async fn update(
    pool: &SqlitePool,
    restaurant_id: &str,
    id: &str,
    data: DishUpdate,
) -> RepoResult<Dish> {
    if matches!(data.price, Some(p) if p <= 0.0) {
        return Err(RepoError::Validation("价格必须大于0".into()));
    }
    let rows = sqlx::query(
        "UPDATE dish SET name = COALESCE(?1, name), price = COALESCE(?2, price), \
         category = COALESCE(?3, category), sort_order = COALESCE(?4, sort_order), \
         is_recommended = COALESCE(?5, is_recommended) \
         WHERE restaurant_id = ?6 AND id = ?7",
    )
    .bind(data.name)
    .bind(data.price)
    .bind(data.category)
    .bind(data.sort_order)
    .bind(data.is_recommended)
    .bind(restaurant_id)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dish {id} not found")));
    }
    find_by_id(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Dish {id} not found")))
}

pub async fn delete(pool: &SqlitePool, restaurant_id: &str, id: &str) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM dish WHERE restaurant_id = ? AND id = ?")
        .bind(restaurant_id)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// 批量导入（CSV 上传的后端）：
/// - `id` + `new_id`: 旧菜品改 id（保留其余字段后覆盖导入值）
/// - 仅 `id`: 按 id 插入或覆盖
/// - 仅 `new_id`: 按 new_id 新建
///
/// 全部条目在同一事务内生效。返回处理的条目数。
pub async fn batch_upsert(
    pool: &SqlitePool,
    restaurant_id: &str,
    entries: Vec<DishBatchEntry>,
) -> RepoResult<usize> {
    let mut tx = pool.begin().await?;
    let mut processed = 0usize;

    for entry in entries {
        let target_id = match (&entry.id, &entry.new_id) {
            (Some(id), Some(new_id)) => {
                sqlx::query("DELETE FROM dish WHERE restaurant_id = ? AND id = ?")
                    .bind(restaurant_id)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                new_id.clone()
            }
            (Some(id), None) => id.clone(),
            (None, Some(new_id)) => new_id.clone(),
            (None, None) => continue,
        };

        sqlx::query(
            "INSERT INTO dish (id, restaurant_id, name, price, category, sort_order, is_recommended) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, price = excluded.price, \
             category = excluded.category, sort_order = excluded.sort_order, \
             is_recommended = excluded.is_recommended",
        )
        .bind(&target_id)
        .bind(restaurant_id)
        .bind(&entry.name)
        .bind(entry.price)
        .bind(&entry.category)
        .bind(entry.sort_order)
        .bind(entry.is_recommended)
        .execute(&mut *tx)
        .await?;
        processed += 1;
    }

    tx.commit().await?;
    Ok(processed)
}
