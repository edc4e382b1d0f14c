//! Route definitions for the Stock Management Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - product catalog
        .nest("/products", product_routes(state.clone()))
        // Protected routes - stock movements
        .nest("/entries", entry_routes(state.clone()))
        .nest("/exits", exit_routes(state.clone()))
        // Protected routes - derived stock view
        .nest("/stock", stock_routes(state.clone()))
        // Protected routes - consumption forecast and settings
        .nest("/consumption", consumption_routes(state.clone()))
        // Protected routes - reports and CSV export
        .nest("/reports", report_routes(state.clone()))
        // Protected routes - AI-assisted invoice import
        .nest("/import", import_routes(state))
}

/// Product catalog routes (protected)
fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route("/batch", post(handlers::create_products_batch))
        .route(
            "/:product_id",
            put(handlers::update_product).delete(handlers::delete_product),
        )
        .route("/:product_id/movements", get(handlers::get_product_movements))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Stock entry routes (protected)
fn entry_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_entries).post(handlers::create_entry))
        .route("/batch", post(handlers::create_entries_batch))
        .route(
            "/:entry_id",
            put(handlers::update_entry).delete(handlers::delete_entry),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Stock exit routes (protected)
fn exit_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_exits).post(handlers::create_exit))
        .route(
            "/:exit_id",
            put(handlers::update_exit).delete(handlers::delete_exit),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Derived stock view routes (protected)
fn stock_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_stock_view))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Consumption forecast routes (protected)
fn consumption_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/report", get(handlers::get_consumption_report))
        .route("/settings", get(handlers::get_settings))
        .route("/settings/forecast", put(handlers::update_forecast))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Report and export routes (protected)
fn report_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/metrics", get(handlers::get_report_metrics))
        .route("/export/products", get(handlers::export_products))
        .route("/export/entries", get(handlers::export_entries))
        .route("/export/exits", get(handlers::export_exits))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Invoice import routes (protected)
fn import_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/entries", post(handlers::import_invoice_entries))
        .route("/products", post(handlers::import_invoice_products))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
