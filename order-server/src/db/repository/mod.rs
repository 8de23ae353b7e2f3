//! Repository Module
//!
//! Free functions over `&SqlitePool` / open transactions, one file per table
//! family. Runtime-checked queries only.

pub mod dish;
pub mod order;
pub mod point_card;
pub mod point_log;
pub mod restaurant;
pub mod settings;

use crate::utils::AppError;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Conflict(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(e) => AppError::database(e.to_string()),
            RepoError::Serialization(e) => AppError::internal(e.to_string()),
        }
    }
}
