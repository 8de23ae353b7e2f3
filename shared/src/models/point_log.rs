//! Daily Ledger Models (点数消耗日志 / 菜品销量日志)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Daily point-consumption ledger entry
///
/// One row per restaurant per business day; `count` is the number of orders
/// placed that day (one order = one point).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLog {
    /// Business date (YYYY-MM-DD, restaurant business timezone)
    pub date: String,
    pub count: i64,
}

/// Database row for [`PointLog`]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PointLogRow {
    pub restaurant_id: String,
    pub date: String,
    pub count: i64,
    /// TTL timestamp, refreshed on every touch (~90 days after last activity)
    pub expire_at: i64,
}

impl From<PointLogRow> for PointLog {
    fn from(row: PointLogRow) -> Self {
        PointLog {
            date: row.date,
            count: row.count,
        }
    }
}

/// Daily per-dish sales ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishOrderLog {
    pub date: String,
    /// dish id -> quantity sum for the day
    pub counts: HashMap<String, i64>,
}

/// Database row for [`DishOrderLog`] (`counts` is JSON text)
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DishOrderLogRow {
    pub restaurant_id: String,
    pub date: String,
    pub counts: String,
    /// TTL timestamp (~30 days - deliberately shorter than the point log)
    pub expire_at: i64,
}

impl DishOrderLogRow {
    pub fn into_log(self) -> Result<DishOrderLog, serde_json::Error> {
        Ok(DishOrderLog {
            date: self.date,
            counts: serde_json::from_str(&self.counts)?,
        })
    }
}
