//! HTTP handlers for the consumption forecast and user settings

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use shared::consumption::ConsumptionLine;
use shared::models::UserSettings;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::{ConsumptionService, SettingsService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ConsumptionQuery {
    /// Preview the report with a forecast other than the stored one
    pub forecast: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateForecastInput {
    pub monthly_forecast: i64,
}

/// Get the consumption report (planned vs actual over the last 30 days)
pub async fn get_consumption_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ConsumptionQuery>,
) -> AppResult<Json<Vec<ConsumptionLine>>> {
    let service = ConsumptionService::new(state.db);
    let report = service
        .get_report(current_user.0.user_id, query.forecast)
        .await?;
    Ok(Json(report))
}

/// Get the current user's settings
pub async fn get_settings(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<UserSettings>> {
    let service = SettingsService::new(state.db);
    let settings = service.get_settings(current_user.0.user_id).await?;
    Ok(Json(settings))
}

/// Store the monthly forecast
pub async fn update_forecast(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<UpdateForecastInput>,
) -> AppResult<Json<UserSettings>> {
    let service = SettingsService::new(state.db);
    let settings = service
        .set_monthly_forecast(current_user.0.user_id, input.monthly_forecast)
        .await?;
    Ok(Json(settings))
}
