//! HTTP handlers for product catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use shared::models::{Product, StockEntry, StockExit};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::entry::EntryService;
use crate::services::exit::ExitService;
use crate::services::product::{CreateProductInput, ProductService, UpdateProductInput};
use crate::AppState;

/// Movement history for a single product
#[derive(Debug, Serialize)]
pub struct ProductMovements {
    pub product: Product,
    pub entries: Vec<StockEntry>,
    pub exits: Vec<StockExit>,
}

/// List all products, ordered by name
pub async fn list_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db);
    let products = service.list_products(current_user.0.user_id).await?;
    Ok(Json(products))
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service
        .create_product(current_user.0.user_id, input)
        .await?;
    Ok(Json(product))
}

/// Create several products atomically
pub async fn create_products_batch(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(inputs): Json<Vec<CreateProductInput>>,
) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db);
    let products = service.create_many(current_user.0.user_id, inputs).await?;
    Ok(Json(products))
}

/// Update a product (partial)
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service
        .update_product(current_user.0.user_id, product_id, input)
        .await?;
    Ok(Json(product))
}

/// Get the entry/exit history of one product, newest first
pub async fn get_product_movements(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ProductMovements>> {
    let user_id = current_user.0.user_id;
    let product = ProductService::new(state.db.clone())
        .get_product(user_id, product_id)
        .await?;
    let entries = EntryService::new(state.db.clone())
        .list_entries_for_product(user_id, product_id)
        .await?;
    let exits = ExitService::new(state.db)
        .list_exits_for_product(user_id, product_id)
        .await?;

    Ok(Json(ProductMovements {
        product,
        entries,
        exits,
    }))
}

/// Delete a product and all of its entries and exits
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ProductService::new(state.db);
    service
        .delete_product_cascade(current_user.0.user_id, product_id)
        .await?;
    Ok(Json(()))
}
