//! Order Models (下单)

use serde::{Deserialize, Serialize};

use super::dish::Dish;
use crate::error::ErrorCode;
use crate::util::millis_to_iso;

/// One order line: full dish snapshot plus quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub dish: Dish,
    pub quantity: u32,
}

/// Place-order request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderInput {
    pub restaurant_id: String,
    pub table_id: String,
    pub table_number: String,
    pub order: Vec<OrderItem>,
    pub total: f64,
    /// Client-generated idempotency key; a retry carrying the same key
    /// returns the originally placed order instead of charging again.
    #[serde(default)]
    pub client_request_id: Option<String>,
}

/// A committed order (API shape, ISO timestamp)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub id: String,
    pub restaurant_id: String,
    pub table_id: String,
    pub table_number: String,
    pub order: Vec<OrderItem>,
    pub total: f64,
    /// Placement time (ISO-8601)
    pub placed_at: String,
}

/// Database row for [`PlacedOrder`]
///
/// `items` is the JSON-encoded `Vec<OrderItem>`; `expire_at` drives the TTL
/// sweeper, not business logic.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PlacedOrderRow {
    pub id: String,
    pub restaurant_id: String,
    pub table_id: String,
    pub table_number: String,
    pub items: String,
    pub total: f64,
    pub placed_at: i64,
    pub expire_at: i64,
    pub client_request_id: Option<String>,
}

impl PlacedOrderRow {
    /// Decode the row into the API shape (strict parse at the store boundary)
    pub fn into_order(self) -> Result<PlacedOrder, serde_json::Error> {
        let order: Vec<OrderItem> = serde_json::from_str(&self.items)?;
        Ok(PlacedOrder {
            id: self.id,
            restaurant_id: self.restaurant_id,
            table_id: self.table_id,
            table_number: self.table_number,
            order,
            total: self.total,
            placed_at: millis_to_iso(self.placed_at),
        })
    }
}

/// Update-order payload (kitchen "add dish" workflow)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderInput {
    pub order: Vec<OrderItem>,
    pub total: f64,
}

/// Result of `place_order` / `update_order`
///
/// Never surfaced as an HTTP error: rejections and critical failures are both
/// carried in the body so the client can decide whether a local-ledger
/// fallback applies (only for critical/infra failures, never for
/// rejections - a closed restaurant must not silently queue orders).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderResult {
    pub order: Option<PlacedOrder>,
    pub logs: Vec<String>,
    pub error: Option<String>,
    /// [`ErrorCode`] as u16; business rejection below 9000, critical 9xxx
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u16>,
}

impl PlaceOrderResult {
    pub fn success(order: PlacedOrder, log: impl Into<String>) -> Self {
        Self {
            order: Some(order),
            logs: vec![log.into()],
            error: None,
            error_code: None,
        }
    }

    /// Soft business rejection - the user must change state and resubmit
    pub fn rejected(code: ErrorCode, message: impl Into<String>, log: impl Into<String>) -> Self {
        Self {
            order: None,
            logs: vec![log.into()],
            error: Some(message.into()),
            error_code: Some(code.code()),
        }
    }

    /// Critical/infrastructure failure - client may apply its local fallback
    pub fn critical(message: impl Into<String>, log: impl Into<String>) -> Self {
        Self {
            order: None,
            logs: vec![log.into()],
            error: Some(message.into()),
            error_code: Some(ErrorCode::InternalError.code()),
        }
    }

    /// True when the failure is a validation rejection rather than an
    /// infrastructure error
    pub fn is_rejection(&self) -> bool {
        matches!(self.error_code, Some(code) if code < 9000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dish() -> Dish {
        Dish {
            id: "d1".into(),
            restaurant_id: "r1".into(),
            name: "宫保鸡丁".into(),
            price: 28.0,
            category: "热菜".into(),
            sort_order: 0,
            is_recommended: true,
        }
    }

    #[test]
    fn row_round_trips_items_json() {
        let items = vec![OrderItem {
            dish: sample_dish(),
            quantity: 2,
        }];
        let row = PlacedOrderRow {
            id: "o1".into(),
            restaurant_id: "r1".into(),
            table_id: "t1".into(),
            table_number: "1".into(),
            items: serde_json::to_string(&items).unwrap(),
            total: 56.0,
            placed_at: 1_704_067_200_000,
            expire_at: 1_706_745_600_000,
            client_request_id: None,
        };
        let order = row.into_order().unwrap();
        assert_eq!(order.order, items);
        assert!(order.placed_at.starts_with("2024-01-01"));
    }

    #[test]
    fn rejection_kind_is_distinguishable() {
        let rejected = PlaceOrderResult::rejected(ErrorCode::InsufficientPoints, "x", "log");
        assert!(rejected.is_rejection());
        let critical = PlaceOrderResult::critical("boom", "log");
        assert!(!critical.is_rejection());
    }
}
