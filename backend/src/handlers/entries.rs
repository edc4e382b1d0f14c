//! HTTP handlers for stock entry endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared::models::StockEntry;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::entry::{CreateEntryInput, EntryService, UpdateEntryInput};
use crate::AppState;

/// List all entries, newest first
pub async fn list_entries(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<StockEntry>>> {
    let service = EntryService::new(state.db);
    let entries = service.list_entries(current_user.0.user_id).await?;
    Ok(Json(entries))
}

/// Record a stock entry
pub async fn create_entry(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateEntryInput>,
) -> AppResult<Json<StockEntry>> {
    let service = EntryService::new(state.db);
    let entry = service.create_entry(current_user.0.user_id, input).await?;
    Ok(Json(entry))
}

/// Record several entries atomically (invoice import confirmation)
pub async fn create_entries_batch(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(inputs): Json<Vec<CreateEntryInput>>,
) -> AppResult<Json<Vec<StockEntry>>> {
    let service = EntryService::new(state.db);
    let entries = service.create_many(current_user.0.user_id, inputs).await?;
    Ok(Json(entries))
}

/// Update an entry (partial)
pub async fn update_entry(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(entry_id): Path<Uuid>,
    Json(input): Json<UpdateEntryInput>,
) -> AppResult<Json<StockEntry>> {
    let service = EntryService::new(state.db);
    let entry = service
        .update_entry(current_user.0.user_id, entry_id, input)
        .await?;
    Ok(Json(entry))
}

/// Delete an entry
pub async fn delete_entry(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = EntryService::new(state.db);
    service.delete_entry(current_user.0.user_id, entry_id).await?;
    Ok(Json(()))
}
