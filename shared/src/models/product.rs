//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product in the catalog
///
/// `min_stock` is the threshold at or below which the derived balance is
/// flagged as low. `consumption_unit`/`consumption_rate` are optional
/// forecast parameters: the rate is the quantity of this product consumed
/// per one unit of the user's monthly forecast metric (e.g. per patient
/// visit). Products without both fields do not appear in the consumption
/// report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Unit label for stock quantities (e.g. "caixa", "un")
    pub unit: String,
    pub min_stock: i64,
    pub price: Decimal,
    pub consumption_unit: Option<String>,
    pub consumption_rate: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether this product participates in the consumption forecast view
    pub fn tracks_consumption(&self) -> bool {
        self.consumption_unit.is_some()
            && self.consumption_rate.map_or(false, |r| r > Decimal::ZERO)
    }
}
