//! Reporting and CSV export service
//!
//! Produces the dashboard metrics and the three downloadable CSV files
//! (products, entries, exits). CSV output is UTF-8 with a byte-order mark so
//! spreadsheet applications pick up accented characters correctly.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use shared::models::{Product, StockEntry, StockExit};
use shared::stock::compute_stock_lines;

use crate::error::{AppError, AppResult};
use crate::services::{EntryService, ExitService, ProductService};

const BOM: &str = "\u{feff}";

/// Export service for reports and CSV downloads
#[derive(Clone)]
pub struct ExportService {
    db: PgPool,
}

/// Dashboard metrics for the reports view
#[derive(Debug, Serialize)]
pub struct ReportMetrics {
    pub total_stock_value: Decimal,
    pub low_stock_count: i64,
    pub total_items_in_stock: i64,
    pub product_diversity: i64,
    pub low_stock_products: Vec<LowStockProduct>,
    pub most_moved_products: Vec<MostMovedProduct>,
}

/// Low-stock row in the report
#[derive(Debug, Serialize)]
pub struct LowStockProduct {
    pub product_id: Uuid,
    pub name: String,
    pub balance: i64,
    pub min_stock: i64,
}

/// Top-mover row in the report, ranked by total exits
#[derive(Debug, Serialize)]
pub struct MostMovedProduct {
    pub product_id: Uuid,
    pub name: String,
    pub total_exits: i64,
}

impl ExportService {
    /// Create a new ExportService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Compute the dashboard metrics for the reports view
    pub async fn report_metrics(&self, user_id: Uuid) -> AppResult<ReportMetrics> {
        let (products, entries, exits) = self.load_all(user_id).await?;
        Ok(build_report_metrics(&products, &entries, &exits))
    }

    /// Export the product catalog as CSV
    pub async fn export_products_csv(&self, user_id: Uuid) -> AppResult<String> {
        let products = ProductService::new(self.db.clone())
            .list_products(user_id)
            .await?;
        products_to_csv(&products)
    }

    /// Export entries as CSV, with resolved product names
    pub async fn export_entries_csv(&self, user_id: Uuid) -> AppResult<String> {
        let products = ProductService::new(self.db.clone())
            .list_products(user_id)
            .await?;
        let entries = EntryService::new(self.db.clone())
            .list_entries(user_id)
            .await?;
        entries_to_csv(&entries, &products)
    }

    /// Export exits as CSV, with resolved product names
    pub async fn export_exits_csv(&self, user_id: Uuid) -> AppResult<String> {
        let products = ProductService::new(self.db.clone())
            .list_products(user_id)
            .await?;
        let exits = ExitService::new(self.db.clone()).list_exits(user_id).await?;
        exits_to_csv(&exits, &products)
    }

    async fn load_all(
        &self,
        user_id: Uuid,
    ) -> AppResult<(Vec<Product>, Vec<StockEntry>, Vec<StockExit>)> {
        let products = ProductService::new(self.db.clone())
            .list_products(user_id)
            .await?;
        let entries = EntryService::new(self.db.clone())
            .list_entries(user_id)
            .await?;
        let exits = ExitService::new(self.db.clone()).list_exits(user_id).await?;
        Ok((products, entries, exits))
    }
}

/// Build the dashboard metrics from loaded records
pub fn build_report_metrics(
    products: &[Product],
    entries: &[StockEntry],
    exits: &[StockExit],
) -> ReportMetrics {
    let lines = compute_stock_lines(products, entries, exits);

    let total_stock_value: Decimal = lines
        .iter()
        .map(|l| Decimal::from(l.balance) * l.price)
        .sum();
    let total_items_in_stock: i64 = lines.iter().map(|l| l.balance).sum();
    let low_stock_count = lines.iter().filter(|l| l.low_stock).count() as i64;

    let mut low_stock_products: Vec<LowStockProduct> = lines
        .iter()
        .filter(|l| l.low_stock)
        .map(|l| LowStockProduct {
            product_id: l.product_id,
            name: l.name.clone(),
            balance: l.balance,
            min_stock: l.min_stock,
        })
        .collect();
    low_stock_products.sort_by(|a, b| a.name.cmp(&b.name));

    let mut by_exits: Vec<&_> = lines.iter().collect();
    by_exits.sort_by(|a, b| b.total_exits.cmp(&a.total_exits));
    let most_moved_products: Vec<MostMovedProduct> = by_exits
        .into_iter()
        .take(5)
        .filter(|l| l.total_exits > 0)
        .map(|l| MostMovedProduct {
            product_id: l.product_id,
            name: l.name.clone(),
            total_exits: l.total_exits,
        })
        .collect();

    ReportMetrics {
        total_stock_value,
        low_stock_count,
        total_items_in_stock,
        product_diversity: products.len() as i64,
        low_stock_products,
        most_moved_products,
    }
}

/// Render the product catalog as CSV
pub fn products_to_csv(products: &[Product]) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["ID", "Nome do Produto", "Unidade", "Estoque Mínimo", "Preço (R$)"])
        .map_err(csv_error)?;
    for product in products {
        wtr.write_record([
            product.id.to_string(),
            product.name.clone(),
            product.unit.clone(),
            product.min_stock.to_string(),
            product.price.to_string(),
        ])
        .map_err(csv_error)?;
    }
    finish(wtr)
}

/// Render entries as CSV with the product name resolved per row
pub fn entries_to_csv(entries: &[StockEntry], products: &[Product]) -> AppResult<String> {
    let names: HashMap<Uuid, &str> = products
        .iter()
        .map(|p| (p.id, p.name.as_str()))
        .collect();

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "ID da Entrada",
        "Data",
        "Produto",
        "Fornecedor",
        "Quantidade",
        "ID do Produto",
    ])
    .map_err(csv_error)?;
    for entry in entries {
        let product_name = names.get(&entry.product_id).copied().unwrap_or("N/A");
        wtr.write_record([
            entry.id.to_string(),
            entry.date.to_string(),
            product_name.to_string(),
            entry.supplier.clone(),
            entry.quantity.to_string(),
            entry.product_id.to_string(),
        ])
        .map_err(csv_error)?;
    }
    finish(wtr)
}

/// Render exits as CSV with the product name resolved per row
pub fn exits_to_csv(exits: &[StockExit], products: &[Product]) -> AppResult<String> {
    let names: HashMap<Uuid, &str> = products
        .iter()
        .map(|p| (p.id, p.name.as_str()))
        .collect();

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["ID da Saída", "Data", "Produto", "Quantidade", "ID do Produto"])
        .map_err(csv_error)?;
    for exit in exits {
        let product_name = names.get(&exit.product_id).copied().unwrap_or("N/A");
        wtr.write_record([
            exit.id.to_string(),
            exit.date.to_string(),
            product_name.to_string(),
            exit.quantity.to_string(),
            exit.product_id.to_string(),
        ])
        .map_err(csv_error)?;
    }
    finish(wtr)
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> AppResult<String> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
    let body = String::from_utf8(bytes)
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
    Ok(format!("{}{}", BOM, body))
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::Internal(format!("CSV serialization error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn product(name: &str, min_stock: i64, price: i64) -> Product {
        Product {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: name.to_string(),
            unit: "un".to_string(),
            min_stock,
            price: Decimal::from(price),
            consumption_unit: None,
            consumption_rate: None,
            created_at: Utc::now(),
        }
    }

    fn entry(product_id: Uuid, quantity: i64) -> StockEntry {
        StockEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            product_id,
            supplier: "Fornecedor, Ltda".to_string(),
            quantity,
            created_at: Utc::now(),
        }
    }

    fn exit(product_id: Uuid, quantity: i64) -> StockExit {
        StockExit {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2024, 3, 16).unwrap(),
            product_id,
            quantity,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn products_csv_starts_with_bom_and_headers() {
        let csv = products_to_csv(&[product("Gaze", 5, 2)]).unwrap();
        assert!(csv.starts_with('\u{feff}'));
        assert!(csv
            .trim_start_matches('\u{feff}')
            .starts_with("ID,Nome do Produto,Unidade,Estoque Mínimo,Preço (R$)"));
    }

    #[test]
    fn fields_with_commas_are_quoted_and_quotes_doubled() {
        let p = product(r#"Luva "P", caixa"#, 0, 1);
        let csv = products_to_csv(&[p]).unwrap();
        assert!(csv.contains(r#""Luva ""P"", caixa""#));
    }

    #[test]
    fn entries_csv_resolves_product_names() {
        let p = product("Seringa", 0, 1);
        let e = entry(p.id, 7);
        let csv = entries_to_csv(&[e], &[p]).unwrap();
        assert!(csv.contains("Seringa"));
        assert!(csv.contains("2024-03-15"));
        assert!(csv.contains(r#""Fornecedor, Ltda""#));
    }

    #[test]
    fn missing_product_falls_back_to_na() {
        let e = entry(Uuid::new_v4(), 3);
        let csv = entries_to_csv(&[e], &[]).unwrap();
        assert!(csv.contains("N/A"));

        let x = exit(Uuid::new_v4(), 2);
        let csv = exits_to_csv(&[x], &[]).unwrap();
        assert!(csv.contains("N/A"));
    }

    #[test]
    fn report_metrics_aggregate_balances() {
        let a = product("Caro", 0, 10);
        let b = product("Baixo", 100, 1);
        let entries = vec![entry(a.id, 5), entry(b.id, 2)];
        let exits = vec![exit(a.id, 1)];

        let metrics = build_report_metrics(&[a, b], &entries, &exits);
        // Caro: balance 4 x 10 = 40, Baixo: balance 2 x 1 = 2
        assert_eq!(metrics.total_stock_value, Decimal::from(42));
        assert_eq!(metrics.total_items_in_stock, 6);
        assert_eq!(metrics.low_stock_count, 1);
        assert_eq!(metrics.product_diversity, 2);
        assert_eq!(metrics.low_stock_products.len(), 1);
        assert_eq!(metrics.low_stock_products[0].name, "Baixo");
        // only products with exits rank as movers
        assert_eq!(metrics.most_moved_products.len(), 1);
        assert_eq!(metrics.most_moved_products[0].name, "Caro");
    }
}
