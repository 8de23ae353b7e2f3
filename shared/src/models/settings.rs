//! Per-restaurant Settings Model (设置)
//!
//! Read-mostly admission policy consumed by the Order Placement Engine,
//! written by the admin dashboard.

use serde::{Deserialize, Serialize};

/// How the kitchen display obtains new orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderFetchMode {
    Push,
    Pull,
}

impl OrderFetchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderFetchMode::Push => "push",
            OrderFetchMode::Pull => "pull",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "pull" => OrderFetchMode::Pull,
            _ => OrderFetchMode::Push,
        }
    }
}

/// Which dashboard sections the restaurant admin can see
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureVisibility {
    pub menu_management: bool,
    pub category_sort: bool,
    pub general_settings: bool,
    pub point_card_recharge: bool,
    pub security_settings: bool,
}

impl Default for FeatureVisibility {
    fn default() -> Self {
        Self {
            menu_management: true,
            category_sort: true,
            general_settings: true,
            point_card_recharge: true,
            security_settings: true,
        }
    }
}

/// Per-restaurant settings singleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Manual closure flag - takes precedence over every other check
    pub is_restaurant_closed: bool,
    /// Disables the online ordering surface only (offline ordering stays)
    pub is_online_ordering_disabled: bool,
    /// Start of the daily auto-close window, "HH:MM"
    pub auto_close_start_time: String,
    /// End of the daily auto-close window, "HH:MM"; a start later than the
    /// end means the window wraps midnight
    pub auto_close_end_time: String,
    pub table_count: u32,
    /// Empty string means the kitchen display requires no password
    pub kitchen_display_password: String,
    pub order_fetch_mode: OrderFetchMode,
    pub order_pull_interval_seconds: u32,
    /// How many recent orders the kitchen display keeps in sync
    pub sync_order_count: u32,
    pub show_kitchen_layout_switch: bool,
    pub category_order: Vec<String>,
    pub feature_visibility: FeatureVisibility,
    pub admin_username: String,
    pub admin_password: String,
    /// Optional operator code required by the ordering surface
    pub place_order_op_code: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            is_restaurant_closed: false,
            is_online_ordering_disabled: false,
            auto_close_start_time: "01:00".to_string(),
            auto_close_end_time: "07:30".to_string(),
            table_count: 20,
            kitchen_display_password: String::new(),
            order_fetch_mode: OrderFetchMode::Push,
            order_pull_interval_seconds: 10,
            sync_order_count: 30,
            show_kitchen_layout_switch: false,
            category_order: Vec::new(),
            feature_visibility: FeatureVisibility::default(),
            admin_username: "admin".to_string(),
            admin_password: "888888".to_string(),
            place_order_op_code: None,
        }
    }
}

/// Database row for [`AppSettings`], JSON text for the nested columns
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AppSettingsRow {
    pub restaurant_id: String,
    pub is_restaurant_closed: bool,
    pub is_online_ordering_disabled: bool,
    pub auto_close_start_time: String,
    pub auto_close_end_time: String,
    pub table_count: i64,
    pub kitchen_display_password: String,
    pub order_fetch_mode: String,
    pub order_pull_interval_seconds: i64,
    pub sync_order_count: i64,
    pub show_kitchen_layout_switch: bool,
    pub category_order: String,
    pub feature_visibility: String,
    pub admin_username: String,
    pub admin_password: String,
    pub place_order_op_code: Option<String>,
}

impl AppSettingsRow {
    /// Decode into [`AppSettings`], falling back field-wise to defaults when
    /// a JSON column is damaged (parse at the boundary, never trust raw rows)
    pub fn into_settings(self) -> AppSettings {
        let defaults = AppSettings::default();
        let category_order = serde_json::from_str(&self.category_order).unwrap_or_else(|e| {
            tracing::warn!(
                restaurant_id = %self.restaurant_id,
                "Invalid category_order JSON, using default: {}", e
            );
            defaults.category_order.clone()
        });
        let feature_visibility =
            serde_json::from_str(&self.feature_visibility).unwrap_or_else(|e| {
                tracing::warn!(
                    restaurant_id = %self.restaurant_id,
                    "Invalid feature_visibility JSON, using default: {}", e
                );
                defaults.feature_visibility.clone()
            });
        AppSettings {
            is_restaurant_closed: self.is_restaurant_closed,
            is_online_ordering_disabled: self.is_online_ordering_disabled,
            auto_close_start_time: self.auto_close_start_time,
            auto_close_end_time: self.auto_close_end_time,
            table_count: self.table_count.max(0) as u32,
            kitchen_display_password: self.kitchen_display_password,
            order_fetch_mode: OrderFetchMode::parse(&self.order_fetch_mode),
            order_pull_interval_seconds: self.order_pull_interval_seconds.max(0) as u32,
            sync_order_count: self.sync_order_count.max(0) as u32,
            show_kitchen_layout_switch: self.show_kitchen_layout_switch,
            category_order,
            feature_visibility,
            admin_username: self.admin_username,
            admin_password: self.admin_password,
            place_order_op_code: self.place_order_op_code,
        }
    }
}

/// Partial update for the general settings form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub is_restaurant_closed: Option<bool>,
    pub is_online_ordering_disabled: Option<bool>,
    pub auto_close_start_time: Option<String>,
    pub auto_close_end_time: Option<String>,
    pub table_count: Option<u32>,
    pub kitchen_display_password: Option<String>,
    pub place_order_op_code: Option<String>,
}

/// Partial update for the sync/advanced settings form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncSettingsUpdate {
    pub order_fetch_mode: Option<OrderFetchMode>,
    pub order_pull_interval_seconds: Option<u32>,
    pub sync_order_count: Option<u32>,
    pub kitchen_display_password: Option<String>,
    pub show_kitchen_layout_switch: Option<bool>,
    pub feature_visibility: Option<FeatureVisibility>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_json_columns_fall_back_to_defaults() {
        let row = AppSettingsRow {
            restaurant_id: "r1".into(),
            is_restaurant_closed: true,
            is_online_ordering_disabled: false,
            auto_close_start_time: "23:00".into(),
            auto_close_end_time: "06:00".into(),
            table_count: 12,
            kitchen_display_password: String::new(),
            order_fetch_mode: "pull".into(),
            order_pull_interval_seconds: 5,
            sync_order_count: 50,
            show_kitchen_layout_switch: false,
            category_order: "not json".into(),
            feature_visibility: "{broken".into(),
            admin_username: "admin".into(),
            admin_password: "888888".into(),
            place_order_op_code: None,
        };
        let settings = row.into_settings();
        assert!(settings.is_restaurant_closed);
        assert_eq!(settings.order_fetch_mode, OrderFetchMode::Pull);
        assert!(settings.category_order.is_empty());
        assert_eq!(settings.feature_visibility, FeatureVisibility::default());
    }
}
