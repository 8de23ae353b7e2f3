use chrono_tz::Tz;

use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/order-server | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | BUSINESS_TIMEZONE | Asia/Shanghai | 业务时区 (日志日期键与打烊时段共用) |
/// | SUPER_ADMIN_PASSWORD | admin123456 | 超级管理员密码 |
/// | RATE_LIMIT_ENABLED | false | 是否启用限流 |
/// | RATE_LIMIT_REQUESTS | 20 | 每窗口请求上限 |
/// | RATE_LIMIT_WINDOW_SECONDS | 60 | 限流窗口 (秒) |
/// | SETTINGS_CACHE_TTL_SECONDS | 60 | 设置缓存 TTL (秒) |
/// | CLEANUP_INTERVAL_SECONDS | 3600 | 过期清理间隔 (秒) |
/// | ENVIRONMENT | development | 运行环境 |
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 业务时区：日账本日期键、自动打烊窗口统一用它判定
    pub business_timezone: Tz,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 超级管理员密码
    pub super_admin_password: String,

    // === 限流 ===
    pub rate_limit_enabled: bool,
    pub rate_limit_requests: u32,
    pub rate_limit_window_seconds: u32,

    // === 缓存与清理 ===
    pub settings_cache_ttl_seconds: u64,
    pub cleanup_interval_seconds: u64,
}

impl Config {
    /// 从环境变量加载配置，未设置的项使用默认值
    pub fn from_env() -> Self {
        let business_timezone = std::env::var("BUSINESS_TIMEZONE")
            .ok()
            .and_then(|tz| {
                tz.parse::<Tz>()
                    .inspect_err(|_| tracing::warn!("Invalid BUSINESS_TIMEZONE '{tz}', using Asia/Shanghai"))
                    .ok()
            })
            .unwrap_or(chrono_tz::Asia::Shanghai);

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/order-server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            business_timezone,
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            super_admin_password: std::env::var("SUPER_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "admin123456".into()),
            rate_limit_enabled: std::env::var("RATE_LIMIT_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            rate_limit_requests: std::env::var("RATE_LIMIT_REQUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            rate_limit_window_seconds: std::env::var("RATE_LIMIT_WINDOW_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            settings_cache_ttl_seconds: std::env::var("SETTINGS_CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            cleanup_interval_seconds: std::env::var("CLEANUP_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
        }
    }

    /// 数据库文件路径
    pub fn database_path(&self) -> String {
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| format!("{}/order.db", self.work_dir))
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
