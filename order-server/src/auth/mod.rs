//! 认证模块：JWT 会话与路由守卫
//!
//! 三种会话角色：餐馆管理员 (admin)、平台超级管理员 (super)、
//! 厨房显示屏 (kitchen)。

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, Role};
pub use middleware::{authenticate, require_admin, require_super};
