//! Domain models for the ordering platform
//!
//! Row structs mirror the SQLite schema (Unix-millis timestamps, JSON text
//! columns) and are feature-gated behind `db`; the plain structs are the API
//! shapes (ISO-8601 timestamps at the boundary).

pub mod dish;
pub mod order;
pub mod point_card;
pub mod point_log;
pub mod restaurant;
pub mod settings;

pub use dish::{Dish, DishBatchEntry, DishCreate, DishUpdate};
pub use order::{
    OrderItem, PlaceOrderInput, PlaceOrderResult, PlacedOrder, PlacedOrderRow, UpdateOrderInput,
};
pub use point_card::{CardStatus, PointCard, PointCardRow, RechargeLog};
pub use point_log::{DishOrderLog, DishOrderLogRow, PointLog, PointLogRow};
pub use restaurant::{Restaurant, RestaurantRow};
pub use settings::{
    AppSettings, AppSettingsRow, FeatureVisibility, OrderFetchMode, SettingsUpdate,
    SyncSettingsUpdate,
};
