//! Stock control service
//!
//! Builds the derived stock view from the full movement history. Balances
//! are recomputed on every request, never persisted.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::stock::{
    compute_stock_lines, filter_stock_lines, sort_stock_lines, SortDirection, StockLine,
    StockSortKey, StockStatusFilter,
};

use crate::error::AppResult;
use crate::services::{EntryService, ExitService, ProductService};

/// Stock control service for the derived stock view
#[derive(Clone)]
pub struct StockControlService {
    db: PgPool,
}

/// Query parameters for the stock view
#[derive(Debug, Default, Deserialize)]
pub struct StockQuery {
    /// Case-insensitive substring filter on the product name
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: StockStatusFilter,
    #[serde(default)]
    pub sort_by: StockSortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

impl StockControlService {
    /// Create a new StockControlService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Compute the filtered, sorted stock view for a user
    pub async fn get_stock_view(&self, user_id: Uuid, query: StockQuery) -> AppResult<Vec<StockLine>> {
        let products = ProductService::new(self.db.clone())
            .list_products(user_id)
            .await?;
        let entries = EntryService::new(self.db.clone())
            .list_entries(user_id)
            .await?;
        let exits = ExitService::new(self.db.clone()).list_exits(user_id).await?;

        let lines = compute_stock_lines(&products, &entries, &exits);
        let mut lines = filter_stock_lines(lines, &query.search, query.status);
        sort_stock_lines(&mut lines, query.sort_by, query.direction);

        Ok(lines)
    }
}
