//! HTTP 中间件

pub mod rate_limit;

pub use rate_limit::rate_limit;
