use std::sync::Arc;

use dashmap::DashMap;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::ordering::OrderEngine;
use crate::points::CardService;
use crate::services::SettingsService;
use crate::utils::AppResult;

/// 资源版本管理器
///
/// 使用 DashMap 实现无锁并发的版本号管理。每种资源维护独立的版本号，
/// 写路径在提交后递增，轮询客户端据此判断哪些缓存需要重新拉取。
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// 递增指定资源的版本号并返回新值（不存在时从 0 起，返回 1）
    pub fn bump(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 当前版本号，不存在返回 0
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }

    /// 全量快照（轮询接口用）
    pub fn snapshot(&self) -> std::collections::HashMap<String, u64> {
        self.versions
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect()
    }
}

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，作为 axum 的应用状态在请求间共享。
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务（读池 + 单连接写池）
    pub db: DbService,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    /// 设置解析器（读穿缓存）
    pub settings: SettingsService,
    /// 下单/改单引擎
    pub orders: OrderEngine,
    /// 点卡服务
    pub cards: CardService,
    /// 资源版本管理器（缓存失效轮询）
    pub resource_versions: Arc<ResourceVersions>,
}

impl ServerState {
    /// 初始化服务器状态：数据库 → 各服务
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            crate::utils::AppError::internal(format!(
                "Failed to create work dir {}: {e}",
                config.work_dir
            ))
        })?;

        let db = DbService::new(&config.database_path()).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let settings = SettingsService::new(db.clone(), config.settings_cache_ttl_seconds);
        let orders = OrderEngine::new(db.clone(), settings.clone(), config.business_timezone);
        let cards = CardService::new(db.clone());

        Ok(Self {
            config: config.clone(),
            db,
            jwt_service,
            settings,
            orders,
            cards,
            resource_versions: Arc::new(ResourceVersions::new()),
        })
    }

    /// 写路径提交后调用：递增相关资源版本号
    pub fn bump_versions(&self, resources: &[&str]) {
        for resource in resources {
            self.resource_versions.bump(resource);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_increment_independently() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("dishes:r1"), 0);
        assert_eq!(versions.bump("dishes:r1"), 1);
        assert_eq!(versions.bump("dishes:r1"), 2);
        assert_eq!(versions.bump("restaurants"), 1);
        assert_eq!(versions.get("dishes:r1"), 2);
        assert_eq!(versions.snapshot().len(), 2);
    }
}
