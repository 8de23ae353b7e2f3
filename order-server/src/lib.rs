//! Order Server - 多租户扫码点餐服务端
//!
//! # 架构概述
//!
//! 本模块是 Order Server 的主入口，提供以下核心功能：
//!
//! - **下单引擎** (`ordering`): 事务化下单、改单与营业时间窗口判定
//! - **点数** (`points`): 点卡制卡 / 兑换充值，点数账本
//! - **数据库** (`db`): SQLite 存储，读写分离连接池
//! - **认证** (`auth`): JWT 三种会话（管理员 / 超级管理员 / 厨房）
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! order-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── auth/          # JWT 认证、路由守卫
//! ├── ordering/      # 下单引擎、营业时间窗口
//! ├── points/        # 点卡服务
//! ├── services/      # 设置解析器、TTL 清理
//! ├── middleware/    # 限流
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 工具函数
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod middleware;
pub mod ordering;
pub mod points;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use ordering::OrderEngine;
pub use points::CardService;
pub use services::SettingsService;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境：dotenv、工作目录、日志
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();

    let work_dir =
        std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/order-server".to_string());
    std::fs::create_dir_all(&work_dir)?;

    if std::env::var("LOG_TO_FILE").map(|v| v == "true").unwrap_or(false) {
        let log_dir = format!("{work_dir}/logs");
        std::fs::create_dir_all(&log_dir)?;
        init_logger_with_file(None, Some(&log_dir));
    } else {
        init_logger();
    }

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ____          __
  / __ \_______/ /__  _____
 / / / / ___/ __  / _ \/ ___/
/ /_/ / /  / /_/ /  __/ /
\____/_/   \__,_/\___/_/
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}
