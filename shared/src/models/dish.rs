//! Dish Model (菜品)

use serde::{Deserialize, Serialize};

/// Dish - a menu entry
///
/// Referenced by value inside each order line item: orders snapshot dish data
/// at placement time, so historical orders are decoupled from later menu
/// edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Dish {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub sort_order: i64,
    #[serde(default)]
    pub is_recommended: bool,
}

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishCreate {
    pub name: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub is_recommended: bool,
}

/// Update dish payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DishUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub sort_order: Option<i64>,
    pub is_recommended: Option<bool>,
}

/// Batch import entry
///
/// `id` + `new_id` remaps an existing dish to a new id; `id` alone upserts;
/// `new_id` alone creates with that id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishBatchEntry {
    pub id: Option<String>,
    pub new_id: Option<String>,
    pub name: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub is_recommended: bool,
}
