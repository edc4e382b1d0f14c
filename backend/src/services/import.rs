//! Invoice import service
//!
//! Orchestrates the extraction adapter and the name matcher: a document goes
//! out to the extraction service, the items come back, and each one is
//! matched against the user's catalog. The operator reviews the suggestions
//! before anything is persisted through the entry/product batch endpoints.

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::matching::{match_items, ItemMatch};
use shared::models::Product;

use crate::error::AppResult;
use crate::external::InvoiceExtractionClient;
use crate::services::ProductService;

/// Import service for AI-assisted invoice processing
#[derive(Clone)]
pub struct ImportService {
    db: PgPool,
    client: InvoiceExtractionClient,
}

/// Suggested entries extracted from an invoice, pending operator review
#[derive(Debug, Serialize)]
pub struct EntryImportSuggestion {
    pub supplier: String,
    pub date: chrono::NaiveDate,
    pub items: Vec<ItemMatch>,
}

/// Product names extracted from an invoice that are not yet in the catalog
#[derive(Debug, Serialize)]
pub struct ProductImportSuggestion {
    pub names: Vec<String>,
}

impl ImportService {
    /// Create a new ImportService instance
    pub fn new(db: PgPool, client: InvoiceExtractionClient) -> Self {
        Self { db, client }
    }

    /// Extract entries from an invoice document and match them to products
    pub async fn suggest_entries(
        &self,
        user_id: Uuid,
        document: Vec<u8>,
        mime_type: &str,
    ) -> AppResult<EntryImportSuggestion> {
        let invoice = self.client.extract_invoice(&document, mime_type).await?;
        let products = ProductService::new(self.db.clone())
            .list_products(user_id)
            .await?;

        let items = match_items(&invoice.items, &products);
        Ok(EntryImportSuggestion {
            supplier: invoice.supplier,
            date: invoice.date.unwrap_or_else(|| Utc::now().date_naive()),
            items,
        })
    }

    /// Extract product names from an invoice, dropping known catalog names
    ///
    /// Names are trimmed and de-duplicated case-insensitively; names already
    /// present in the catalog are discarded.
    pub async fn suggest_products(
        &self,
        user_id: Uuid,
        document: Vec<u8>,
        mime_type: &str,
    ) -> AppResult<ProductImportSuggestion> {
        let names = self.client.extract_product_names(&document, mime_type).await?;
        let products = ProductService::new(self.db.clone())
            .list_products(user_id)
            .await?;

        Ok(ProductImportSuggestion {
            names: dedupe_new_names(names, &products),
        })
    }
}

/// Keep trimmed, case-insensitively unique names that are not in the catalog
pub fn dedupe_new_names(names: Vec<String>, products: &[Product]) -> Vec<String> {
    let existing: std::collections::HashSet<String> = products
        .iter()
        .map(|p| p.name.trim().to_lowercase())
        .collect();

    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .filter(|n| !existing.contains(&n.to_lowercase()))
        .filter(|n| seen.insert(n.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn product(name: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: name.to_string(),
            unit: "un".to_string(),
            min_stock: 0,
            price: Decimal::from(1),
            consumption_unit: None,
            consumption_rate: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn dedupe_drops_existing_catalog_names() {
        let catalog = vec![product("Luva Nitrílica")];
        let names = vec![
            " luva nitrílica ".to_string(),
            "Gaze".to_string(),
            "GAZE".to_string(),
            "  ".to_string(),
        ];
        let result = dedupe_new_names(names, &catalog);
        assert_eq!(result, vec!["Gaze".to_string()]);
    }

    #[test]
    fn dedupe_keeps_first_spelling() {
        let names = vec!["Seringa 10ml".to_string(), "seringa 10ML".to_string()];
        let result = dedupe_new_names(names, &[]);
        assert_eq!(result, vec!["Seringa 10ml".to_string()]);
    }
}
