//! Point Card Models (点卡)

use serde::{Deserialize, Serialize};

use crate::util::millis_to_iso;

/// Point card lifecycle state
///
/// The only transition is `new -> used`, taken exactly once by a successful
/// redemption. Used cards are never reusable and never deletable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    New,
    Used,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::New => "new",
            CardStatus::Used => "used",
        }
    }
}

/// A single-use recharge code (global, not tenant-scoped)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointCard {
    /// The card id doubles as the redeem code typed in by an admin
    pub id: String,
    pub points: i64,
    pub created_at: String,
    pub status: CardStatus,
    pub used_by: Option<String>,
    pub used_at: Option<String>,
}

/// Database row for [`PointCard`]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PointCardRow {
    pub id: String,
    pub points: i64,
    pub created_at: i64,
    pub status: String,
    pub used_by: Option<String>,
    pub used_at: Option<i64>,
}

impl From<PointCardRow> for PointCard {
    fn from(row: PointCardRow) -> Self {
        let status = match row.status.as_str() {
            "used" => CardStatus::Used,
            _ => CardStatus::New,
        };
        PointCard {
            id: row.id,
            points: row.points,
            created_at: millis_to_iso(row.created_at),
            status,
            used_by: row.used_by,
            used_at: row.used_at.map(millis_to_iso),
        }
    }
}

/// Recharge audit record, append-only, one per successful redemption
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RechargeLog {
    pub id: String,
    pub restaurant_id: String,
    pub card_id: String,
    pub points_added: i64,
    /// Unix millis; converted at the API boundary
    pub recharged_at: i64,
}
