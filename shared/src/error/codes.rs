//! Unified error codes for the ordering platform
//!
//! This module defines all error codes used across the order server and
//! frontend clients. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Restaurant (tenant) errors
//! - 4xxx: Order errors
//! - 5xxx: Point card errors
//! - 6xxx: Dish errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Restaurant admin role required
    AdminRequired = 2002,
    /// Super-admin role required
    SuperAdminRequired = 2003,
    /// Kitchen display session required
    KitchenSessionRequired = 2004,

    // ==================== 3xxx: Restaurant ====================
    /// Restaurant not found
    RestaurantNotFound = 3001,
    /// Restaurant id missing from request
    RestaurantMissing = 3002,
    /// Restaurant name is empty
    RestaurantNameEmpty = 3003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no line items
    OrderEmpty = 4002,
    /// Prepaid point balance exhausted
    InsufficientPoints = 4003,
    /// Restaurant is manually closed
    RestaurantClosed = 4004,
    /// Online ordering is disabled
    OnlineOrderingDisabled = 4005,
    /// Current time is inside the auto-close window
    OutsideOrderingHours = 4006,

    // ==================== 5xxx: Point card ====================
    /// Point card not found / invalid code
    CardNotFound = 5001,
    /// Point card has already been redeemed
    CardAlreadyUsed = 5002,
    /// A used point card cannot be deleted
    CardUsedCannotDelete = 5003,
    /// Point card face value invalid
    CardPointsInvalid = 5004,

    // ==================== 6xxx: Dish ====================
    /// Dish not found
    DishNotFound = 6001,
    /// Dish has invalid price
    DishInvalidPrice = 6002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Too many requests from this client
    RateLimited = 9100,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Restaurant administrator role is required",
            ErrorCode::SuperAdminRequired => "Super administrator role is required",
            ErrorCode::KitchenSessionRequired => "Kitchen display session is required",

            // Restaurant
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::RestaurantMissing => "Restaurant id is missing",
            ErrorCode::RestaurantNameEmpty => "Restaurant name is empty",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order has no line items",
            ErrorCode::InsufficientPoints => "Insufficient prepaid points",
            ErrorCode::RestaurantClosed => "Restaurant is closed",
            ErrorCode::OnlineOrderingDisabled => "Online ordering is disabled",
            ErrorCode::OutsideOrderingHours => "Inside automatic closing hours",

            // Point card
            ErrorCode::CardNotFound => "Point card not found",
            ErrorCode::CardAlreadyUsed => "Point card has already been redeemed",
            ErrorCode::CardUsedCannotDelete => "A used point card cannot be deleted",
            ErrorCode::CardPointsInvalid => "Point card face value is invalid",

            // Dish
            ErrorCode::DishNotFound => "Dish not found",
            ErrorCode::DishInvalidPrice => "Dish has invalid price",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::RateLimited => "Too many requests",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::InvalidFormat,
            7 => Self::RequiredField,
            1001 => Self::NotAuthenticated,
            1002 => Self::InvalidCredentials,
            1003 => Self::TokenExpired,
            1004 => Self::TokenInvalid,
            1005 => Self::SessionExpired,
            2001 => Self::PermissionDenied,
            2002 => Self::AdminRequired,
            2003 => Self::SuperAdminRequired,
            2004 => Self::KitchenSessionRequired,
            3001 => Self::RestaurantNotFound,
            3002 => Self::RestaurantMissing,
            3003 => Self::RestaurantNameEmpty,
            4001 => Self::OrderNotFound,
            4002 => Self::OrderEmpty,
            4003 => Self::InsufficientPoints,
            4004 => Self::RestaurantClosed,
            4005 => Self::OnlineOrderingDisabled,
            4006 => Self::OutsideOrderingHours,
            5001 => Self::CardNotFound,
            5002 => Self::CardAlreadyUsed,
            5003 => Self::CardUsedCannotDelete,
            5004 => Self::CardPointsInvalid,
            6001 => Self::DishNotFound,
            6002 => Self::DishInvalidPrice,
            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9004 => Self::TimeoutError,
            9005 => Self::ConfigError,
            9100 => Self::RateLimited,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::InsufficientPoints,
            ErrorCode::CardAlreadyUsed,
            ErrorCode::DatabaseError,
            ErrorCode::RateLimited,
        ] {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw).unwrap(), code);
        }
    }

    #[test]
    fn test_invalid_code_rejected() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::InsufficientPoints).unwrap();
        assert_eq!(json, "4003");
        let back: ErrorCode = serde_json::from_str("4003").unwrap();
        assert_eq!(back, ErrorCode::InsufficientPoints);
    }
}
