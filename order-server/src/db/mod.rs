//! Database Module
//!
//! Handles SQLite connection pools and migrations.
//!
//! 写事务全部走单连接写池：SQLite 单写者模型下，
//! 这让"检查-再-写入"序列天然串行化，跨行事务不会交错。

pub mod repository;

use crate::utils::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;

/// Database service — separate read pool and single-connection write pool
#[derive(Clone)]
pub struct DbService {
    read_pool: SqlitePool,
    write_pool: SqlitePool,
}

impl DbService {
    /// Create a new database service with WAL mode
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        // Build connection options: WAL, foreign keys, normal sync
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            .optimize_on_close(true, None);

        // 写池只有一条连接：所有写事务串行，"至多一个赢家"由此保证
        let write_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let read_pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        // busy_timeout: 写冲突时等待 5s 而非立即失败
        for pool in [&write_pool, &read_pool] {
            sqlx::query("PRAGMA busy_timeout = 5000;")
                .execute(pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to set busy_timeout: {e}")))?;
        }

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        // Run migrations (ignore previously applied but now removed migrations)
        sqlx::migrate!("./migrations")
            .set_ignore_missing(true)
            .run(&write_pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self {
            read_pool,
            write_pool,
        })
    }

    /// Pool for read-only queries
    pub fn read(&self) -> &SqlitePool {
        &self.read_pool
    }

    /// Pool for writes and transactions (single connection, serialized)
    pub fn write(&self) -> &SqlitePool {
        &self.write_pool
    }
}
