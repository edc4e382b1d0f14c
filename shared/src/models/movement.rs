//! Stock movement models
//!
//! Entries record inbound stock, exits record outbound stock. Dates are
//! calendar days with no time component. Movements reference products by id
//! only; the storage layer carries no foreign-key constraint, so cascade
//! deletion collects dependents before removing the product.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An inbound stock movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub product_id: Uuid,
    pub supplier: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// An outbound stock movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockExit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub product_id: Uuid,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}
