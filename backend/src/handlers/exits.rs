//! HTTP handlers for stock exit endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared::models::StockExit;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::exit::{CreateExitInput, ExitService, UpdateExitInput};
use crate::AppState;

/// List all exits, newest first
pub async fn list_exits(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<StockExit>>> {
    let service = ExitService::new(state.db);
    let exits = service.list_exits(current_user.0.user_id).await?;
    Ok(Json(exits))
}

/// Record a stock exit
pub async fn create_exit(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateExitInput>,
) -> AppResult<Json<StockExit>> {
    let service = ExitService::new(state.db);
    let exit = service.create_exit(current_user.0.user_id, input).await?;
    Ok(Json(exit))
}

/// Update an exit (partial)
pub async fn update_exit(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(exit_id): Path<Uuid>,
    Json(input): Json<UpdateExitInput>,
) -> AppResult<Json<StockExit>> {
    let service = ExitService::new(state.db);
    let exit = service
        .update_exit(current_user.0.user_id, exit_id, input)
        .await?;
    Ok(Json(exit))
}

/// Delete an exit
pub async fn delete_exit(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(exit_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ExitService::new(state.db);
    service.delete_exit(current_user.0.user_id, exit_id).await?;
    Ok(Json(()))
}
