//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`restaurants`] - 餐馆管理接口（超级管理员）
//! - [`dishes`] - 菜品管理接口
//! - [`settings`] - 餐馆设置接口
//! - [`orders`] - 下单与厨房订单接口
//! - [`point_cards`] - 点卡管理与充值接口
//! - [`point_logs`] - 点数 / 菜品销量日志接口
//! - [`sync`] - 资源版本轮询接口

pub mod auth;
pub mod health;

pub mod dishes;
pub mod orders;
pub mod point_cards;
pub mod point_logs;
pub mod restaurants;
pub mod settings;
pub mod sync;

use crate::core::ServerState;
use axum::Router;

/// 合并所有资源路由
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(restaurants::router())
        .merge(dishes::router())
        .merge(settings::router())
        .merge(orders::router())
        .merge(point_cards::router())
        .merge(point_logs::router())
        .merge(sync::router())
        .with_state(state)
}
