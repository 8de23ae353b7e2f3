//! Restaurant Model (租户)

use serde::{Deserialize, Serialize};

use crate::util::millis_to_iso;

/// Restaurant - an isolated tenant owning its menu, balance and orders
///
/// `points` is the prepaid balance gating order placement. It is mutated only
/// inside the order-placement transaction (decrement) and the point-card
/// redemption transaction (increment).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    /// Creation time (ISO-8601)
    pub created_at: String,
    /// Prepaid point balance (one order consumes exactly one point)
    pub points: i64,
}

/// Database row for [`Restaurant`] (Unix millis)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RestaurantRow {
    pub id: String,
    pub name: String,
    pub created_at: i64,
    pub points: i64,
}

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        Restaurant {
            id: row.id,
            name: row.name,
            created_at: millis_to_iso(row.created_at),
            points: row.points,
        }
    }
}
