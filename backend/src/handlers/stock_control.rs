//! HTTP handlers for the derived stock view

use axum::{
    extract::{Query, State},
    Json,
};

use shared::stock::StockLine;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::stock_control::{StockControlService, StockQuery};
use crate::AppState;

/// Get the derived stock view, filtered and sorted
pub async fn get_stock_view(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<StockQuery>,
) -> AppResult<Json<Vec<StockLine>>> {
    let service = StockControlService::new(state.db);
    let lines = service.get_stock_view(current_user.0.user_id, query).await?;
    Ok(Json(lines))
}
