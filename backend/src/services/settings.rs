//! Per-user settings service

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::UserSettings;
use shared::validation;

use crate::error::{AppError, AppResult};

/// Settings service for per-user configuration
#[derive(Clone)]
pub struct SettingsService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct SettingsRow {
    user_id: Uuid,
    monthly_forecast: i64,
    updated_at: DateTime<Utc>,
}

impl From<SettingsRow> for UserSettings {
    fn from(r: SettingsRow) -> Self {
        UserSettings {
            user_id: r.user_id,
            monthly_forecast: r.monthly_forecast,
            updated_at: r.updated_at,
        }
    }
}

impl SettingsService {
    /// Create a new SettingsService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get settings for a user, falling back to defaults when none are stored
    pub async fn get_settings(&self, user_id: Uuid) -> AppResult<UserSettings> {
        let row = sqlx::query_as::<_, SettingsRow>(
            "SELECT user_id, monthly_forecast, updated_at FROM user_settings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(UserSettings::from).unwrap_or(UserSettings {
            user_id,
            monthly_forecast: 0,
            updated_at: Utc::now(),
        }))
    }

    /// Store the monthly forecast for a user
    pub async fn set_monthly_forecast(
        &self,
        user_id: Uuid,
        monthly_forecast: i64,
    ) -> AppResult<UserSettings> {
        validation::validate_monthly_forecast(monthly_forecast)
            .map_err(|e| AppError::validation("monthly_forecast", e, "Previsão mensal inválida"))?;

        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            INSERT INTO user_settings (user_id, monthly_forecast, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET monthly_forecast = $2, updated_at = NOW()
            RETURNING user_id, monthly_forecast, updated_at
            "#,
        )
        .bind(user_id)
        .bind(monthly_forecast)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }
}
