//! HTTP handlers for AI-assisted invoice import
//!
//! The upload endpoints only produce suggestions; persisting the reviewed
//! batch goes through the products/entries batch endpoints.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::import::{EntryImportSuggestion, ImportService, ProductImportSuggestion};
use crate::AppState;

/// Upload an invoice and get suggested entries matched to the catalog
pub async fn import_invoice_entries(
    State(state): State<AppState>,
    current_user: CurrentUser,
    multipart: Multipart,
) -> AppResult<Json<EntryImportSuggestion>> {
    let (document, mime_type) = read_document(multipart).await?;
    let service = import_service(&state)?;
    let suggestion = service
        .suggest_entries(current_user.0.user_id, document, &mime_type)
        .await?;
    Ok(Json(suggestion))
}

/// Upload an invoice and get new product names not yet in the catalog
pub async fn import_invoice_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
    multipart: Multipart,
) -> AppResult<Json<ProductImportSuggestion>> {
    let (document, mime_type) = read_document(multipart).await?;
    let service = import_service(&state)?;
    let suggestion = service
        .suggest_products(current_user.0.user_id, document, &mime_type)
        .await?;
    Ok(Json(suggestion))
}

fn import_service(state: &AppState) -> AppResult<ImportService> {
    let extraction = &state.config.extraction;
    let client = crate::external::InvoiceExtractionClient::new(
        extraction.api_endpoint.clone(),
        extraction.api_key.clone(),
        extraction.model.clone(),
    )?;
    Ok(ImportService::new(state.db.clone(), client))
}

/// Pull the first file field out of the multipart body
async fn read_document(mut multipart: Multipart) -> AppResult<(Vec<u8>, String)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Invalid multipart body: {}", e)))?
    {
        if field.file_name().is_none() {
            continue;
        }
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::ValidationError(format!("Failed to read upload: {}", e)))?;
        if data.is_empty() {
            return Err(AppError::ValidationError("Uploaded file is empty".to_string()));
        }
        return Ok((data.to_vec(), mime_type));
    }

    Err(AppError::ValidationError(
        "Request must include an invoice file".to_string(),
    ))
}
