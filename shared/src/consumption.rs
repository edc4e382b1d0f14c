//! Consumption forecast calculator
//!
//! Compares planned consumption (monthly forecast x per-unit rate) against
//! actual consumption (exits in the trailing 30-day window) for products that
//! opt into forecasting via `consumption_unit`/`consumption_rate`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Product, StockExit};

/// Days of exit history counted as "actual" consumption
pub const CONSUMPTION_WINDOW_DAYS: i64 = 30;

/// Usage level derived from the raw consumption percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageLevel {
    Normal,
    Warning,
    Critical,
}

impl UsageLevel {
    /// Classify a raw (unclamped) consumption percentage
    pub fn from_percentage(percentage: Decimal) -> Self {
        if percentage > Decimal::from(100) {
            UsageLevel::Critical
        } else if percentage > Decimal::from(80) {
            UsageLevel::Warning
        } else {
            UsageLevel::Normal
        }
    }
}

/// One row of the consumption report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionLine {
    pub product_id: Uuid,
    pub name: String,
    pub consumption_unit: String,
    pub consumption_rate: Decimal,
    /// forecast x rate
    pub planned: Decimal,
    /// Sum of exit quantities inside the trailing window
    pub actual: i64,
    /// planned - actual, negative when overconsumed
    pub balance: Decimal,
    /// actual / planned x 100, never clamped
    pub percentage: Decimal,
    /// Percentage clamped to [0, 100] for progress display
    pub progress: Decimal,
    pub level: UsageLevel,
}

/// Build the consumption report
///
/// Only products with a consumption unit and a positive rate participate.
/// Exits dated `today - 30` days or later (inclusive) count as actual
/// consumption; the window is by calendar date, not timestamp. A zero
/// forecast yields zero planned and a guarded zero percentage.
pub fn compute_consumption_lines(
    products: &[Product],
    exits: &[StockExit],
    monthly_forecast: i64,
    today: NaiveDate,
) -> Vec<ConsumptionLine> {
    let window_start = today - chrono::Duration::days(CONSUMPTION_WINDOW_DAYS);

    products
        .iter()
        .filter(|product| product.tracks_consumption())
        .map(|product| {
            // tracks_consumption guarantees both fields are present
            let unit = product.consumption_unit.clone().unwrap_or_default();
            let rate = product.consumption_rate.unwrap_or(Decimal::ZERO);

            let planned = Decimal::from(monthly_forecast) * rate;
            let actual: i64 = exits
                .iter()
                .filter(|exit| exit.product_id == product.id && exit.date >= window_start)
                .map(|exit| exit.quantity)
                .sum();

            let balance = planned - Decimal::from(actual);
            let percentage = if planned.is_zero() {
                Decimal::ZERO
            } else {
                Decimal::from(actual) / planned * Decimal::from(100)
            };
            let progress = percentage.clamp(Decimal::ZERO, Decimal::from(100));

            ConsumptionLine {
                product_id: product.id,
                name: product.name.clone(),
                consumption_unit: unit,
                consumption_rate: rate,
                planned,
                actual,
                balance,
                percentage,
                progress,
                level: UsageLevel::from_percentage(percentage),
            }
        })
        .collect()
}
