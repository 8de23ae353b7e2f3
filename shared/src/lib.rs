//! Shared types for the DianCan ordering platform
//!
//! Domain models, unified error codes and response structures used by the
//! order server and any future clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
