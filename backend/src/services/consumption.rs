//! Consumption forecast service

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use shared::consumption::{compute_consumption_lines, ConsumptionLine};

use crate::error::AppResult;
use crate::services::{ExitService, ProductService, SettingsService};

/// Consumption service producing the forecast-vs-actual report
#[derive(Clone)]
pub struct ConsumptionService {
    db: PgPool,
}

impl ConsumptionService {
    /// Create a new ConsumptionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Build the consumption report
    ///
    /// Uses the stored monthly forecast unless `forecast_override` is given,
    /// which lets the operator preview a different forecast without saving
    /// it.
    pub async fn get_report(
        &self,
        user_id: Uuid,
        forecast_override: Option<i64>,
    ) -> AppResult<Vec<ConsumptionLine>> {
        let products = ProductService::new(self.db.clone())
            .list_products(user_id)
            .await?;
        let exits = ExitService::new(self.db.clone()).list_exits(user_id).await?;

        let forecast = match forecast_override {
            Some(f) => f,
            None => {
                SettingsService::new(self.db.clone())
                    .get_settings(user_id)
                    .await?
                    .monthly_forecast
            }
        };

        let today = Utc::now().date_naive();
        Ok(compute_consumption_lines(&products, &exits, forecast, today))
    }
}
