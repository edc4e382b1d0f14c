//! Per-user settings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User-level settings persisted across sessions
///
/// `monthly_forecast` is the forecasted number of countable units (patients,
/// procedures, ...) for the next 30 days, used by the consumption report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: Uuid,
    pub monthly_forecast: i64,
    pub updated_at: DateTime<Utc>,
}
