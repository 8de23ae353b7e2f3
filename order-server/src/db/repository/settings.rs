//! Settings Repository (每餐馆单行)

use super::{RepoError, RepoResult};
use shared::models::{AppSettings, AppSettingsRow, SettingsUpdate, SyncSettingsUpdate};
use sqlx::{Sqlite, SqlitePool, Transaction};

const COLUMNS: &str = "restaurant_id, is_restaurant_closed, is_online_ordering_disabled, \
auto_close_start_time, auto_close_end_time, table_count, kitchen_display_password, \
order_fetch_mode, order_pull_interval_seconds, sync_order_count, show_kitchen_layout_switch, \
category_order, feature_visibility, admin_username, admin_password, place_order_op_code";

pub async fn find_by_restaurant(
    pool: &SqlitePool,
    restaurant_id: &str,
) -> RepoResult<Option<AppSettingsRow>> {
    let row = sqlx::query_as::<_, AppSettingsRow>(&format!(
        "SELECT {COLUMNS} FROM app_settings WHERE restaurant_id = ?"
    ))
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// 写入默认设置行（建馆 / 清空数据时复用同一事务）
pub async fn insert_defaults(
    tx: &mut Transaction<'_, Sqlite>,
    restaurant_id: &str,
) -> RepoResult<()> {
    let defaults = AppSettings::default();
    sqlx::query(
        "INSERT INTO app_settings (restaurant_id, category_order, feature_visibility) \
         VALUES (?1, ?2, ?3)",
    )
    .bind(restaurant_id)
    .bind(serde_json::to_string(&defaults.category_order)?)
    .bind(serde_json::to_string(&defaults.feature_visibility)?)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// 常规设置表单（打烊开关、打烊时段等），缺省字段保持原值
pub async fn update_general(
    pool: &SqlitePool,
    restaurant_id: &str,
    update: SettingsUpdate,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE app_settings SET \
         is_restaurant_closed = COALESCE(?1, is_restaurant_closed), \
         is_online_ordering_disabled = COALESCE(?2, is_online_ordering_disabled), \
         auto_close_start_time = COALESCE(?3, auto_close_start_time), \
         auto_close_end_time = COALESCE(?4, auto_close_end_time), \
         table_count = COALESCE(?5, table_count), \
         kitchen_display_password = COALESCE(?6, kitchen_display_password), \
         place_order_op_code = COALESCE(?7, place_order_op_code) \
         WHERE restaurant_id = ?8",
    )
    .bind(update.is_restaurant_closed)
    .bind(update.is_online_ordering_disabled)
    .bind(update.auto_close_start_time)
    .bind(update.auto_close_end_time)
    .bind(update.table_count.map(|v| v as i64))
    .bind(update.kitchen_display_password)
    .bind(update.place_order_op_code)
    .bind(restaurant_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Settings for restaurant {restaurant_id} not found"
        )));
    }
    Ok(())
}

/// 同步/高级设置表单
pub async fn update_sync(
    pool: &SqlitePool,
    restaurant_id: &str,
    update: SyncSettingsUpdate,
) -> RepoResult<()> {
    let feature_visibility = update
        .feature_visibility
        .map(|v| serde_json::to_string(&v))
        .transpose()?;
    let rows = sqlx::query(
        "UPDATE app_settings SET \
         order_fetch_mode = COALESCE(?1, order_fetch_mode), \
         order_pull_interval_seconds = COALESCE(?2, order_pull_interval_seconds), \
         sync_order_count = COALESCE(?3, sync_order_count), \
         kitchen_display_password = COALESCE(?4, kitchen_display_password), \
         show_kitchen_layout_switch = COALESCE(?5, show_kitchen_layout_switch), \
         feature_visibility = COALESCE(?6, feature_visibility) \
         WHERE restaurant_id = ?7",
    )
    .bind(update.order_fetch_mode.map(|m| m.as_str().to_string()))
    .bind(update.order_pull_interval_seconds.map(|v| v as i64))
    .bind(update.sync_order_count.map(|v| v as i64))
    .bind(update.kitchen_display_password)
    .bind(update.show_kitchen_layout_switch)
    .bind(feature_visibility)
    .bind(restaurant_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Settings for restaurant {restaurant_id} not found"
        )));
    }
    Ok(())
}

pub async fn update_category_order(
    pool: &SqlitePool,
    restaurant_id: &str,
    category_order: &[String],
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE app_settings SET category_order = ? WHERE restaurant_id = ?")
        .bind(serde_json::to_string(category_order)?)
        .bind(restaurant_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Settings for restaurant {restaurant_id} not found"
        )));
    }
    Ok(())
}

/// 修改管理员密码（可选同时改用户名）；当前密码校验在 service 层完成
pub async fn update_admin_password(
    pool: &SqlitePool,
    restaurant_id: &str,
    new_password: &str,
    new_username: Option<&str>,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE app_settings SET admin_password = ?1, \
         admin_username = COALESCE(?2, admin_username) WHERE restaurant_id = ?3",
    )
    .bind(new_password)
    .bind(new_username)
    .bind(restaurant_id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Settings for restaurant {restaurant_id} not found"
        )));
    }
    Ok(())
}
