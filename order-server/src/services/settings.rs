//! 设置解析器 (Settings Resolver)
//!
//! 读穿缓存：短 TTL 的 DashMap，设置写入后定点失效。
//! 行缺失或字段损坏时回退默认值——下单路径永远能拿到一份可用设置。

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::db::DbService;
use crate::db::repository::settings as settings_repo;
use crate::utils::AppResult;
use shared::models::{AppSettings, SettingsUpdate, SyncSettingsUpdate};

struct CachedEntry {
    settings: AppSettings,
    fetched_at: Instant,
}

#[derive(Clone)]
pub struct SettingsService {
    db: DbService,
    cache: Arc<DashMap<String, CachedEntry>>,
    ttl: Duration,
}

impl SettingsService {
    pub fn new(db: DbService, ttl_seconds: u64) -> Self {
        Self {
            db,
            cache: Arc::new(DashMap::new()),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// 读取设置；缓存命中直接返回，否则落库并回填
    pub async fn get(&self, restaurant_id: &str) -> AppResult<AppSettings> {
        if let Some(entry) = self.cache.get(restaurant_id)
            && entry.fetched_at.elapsed() < self.ttl
        {
            return Ok(entry.settings.clone());
        }

        let settings = match settings_repo::find_by_restaurant(self.db.read(), restaurant_id)
            .await
            .map_err(crate::utils::AppError::from)?
        {
            Some(row) => row.into_settings(),
            None => {
                tracing::debug!(restaurant_id, "Settings row missing, using defaults");
                AppSettings::default()
            }
        };

        self.cache.insert(
            restaurant_id.to_string(),
            CachedEntry {
                settings: settings.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(settings)
    }

    /// 定点失效；任何设置写入后调用
    pub fn invalidate(&self, restaurant_id: &str) {
        self.cache.remove(restaurant_id);
    }

    pub async fn update_general(
        &self,
        restaurant_id: &str,
        update: SettingsUpdate,
    ) -> AppResult<AppSettings> {
        settings_repo::update_general(self.db.write(), restaurant_id, update).await?;
        self.invalidate(restaurant_id);
        self.get(restaurant_id).await
    }

    pub async fn update_sync(
        &self,
        restaurant_id: &str,
        update: SyncSettingsUpdate,
    ) -> AppResult<AppSettings> {
        settings_repo::update_sync(self.db.write(), restaurant_id, update).await?;
        self.invalidate(restaurant_id);
        self.get(restaurant_id).await
    }

    pub async fn update_category_order(
        &self,
        restaurant_id: &str,
        category_order: &[String],
    ) -> AppResult<()> {
        settings_repo::update_category_order(self.db.write(), restaurant_id, category_order)
            .await?;
        self.invalidate(restaurant_id);
        Ok(())
    }

    /// 改密：先核对当前密码，再写入
    pub async fn update_admin_password(
        &self,
        restaurant_id: &str,
        current_password: &str,
        new_password: &str,
        new_username: Option<&str>,
    ) -> AppResult<()> {
        let settings = self.get(restaurant_id).await?;
        if settings.admin_password != current_password {
            return Err(crate::utils::AppError::with_message(
                crate::utils::ErrorCode::InvalidCredentials,
                "当前密码不正确。",
            ));
        }
        if new_password.len() < 6 {
            return Err(crate::utils::AppError::validation("新密码长度不能少于6位。"));
        }
        settings_repo::update_admin_password(
            self.db.write(),
            restaurant_id,
            new_password,
            new_username,
        )
        .await?;
        self.invalidate(restaurant_id);
        Ok(())
    }
}
