//! HTTP handlers for reports and CSV export

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::export::{ExportService, ReportMetrics};
use crate::AppState;

/// Get dashboard metrics for the reports view
pub async fn get_report_metrics(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<ReportMetrics>> {
    let service = ExportService::new(state.db);
    let metrics = service.report_metrics(current_user.0.user_id).await?;
    Ok(Json(metrics))
}

/// Download the product catalog as CSV
pub async fn export_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<(HeaderMap, String)> {
    let service = ExportService::new(state.db);
    let csv = service.export_products_csv(current_user.0.user_id).await?;
    Ok((csv_headers("produtos.csv"), csv))
}

/// Download entries as CSV
pub async fn export_entries(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<(HeaderMap, String)> {
    let service = ExportService::new(state.db);
    let csv = service.export_entries_csv(current_user.0.user_id).await?;
    Ok((csv_headers("entradas.csv"), csv))
}

/// Download exits as CSV
pub async fn export_exits(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<(HeaderMap, String)> {
    let service = ExportService::new(state.db);
    let csv = service.export_exits_csv(current_user.0.user_id).await?;
    Ok((csv_headers("saidas.csv"), csv))
}

fn csv_headers(filename: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    if let Ok(value) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers
}
