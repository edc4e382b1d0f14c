//! Stock entry service for inbound movements

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::StockEntry;
use shared::validation;

use crate::error::{AppError, AppResult};

/// Entry service for recording inbound stock
#[derive(Clone)]
pub struct EntryService {
    db: PgPool,
}

/// Database row for a stock entry
#[derive(Debug, FromRow)]
struct EntryRow {
    id: Uuid,
    user_id: Uuid,
    date: NaiveDate,
    product_id: Uuid,
    supplier: String,
    quantity: i64,
    created_at: DateTime<Utc>,
}

impl From<EntryRow> for StockEntry {
    fn from(r: EntryRow) -> Self {
        StockEntry {
            id: r.id,
            user_id: r.user_id,
            date: r.date,
            product_id: r.product_id,
            supplier: r.supplier,
            quantity: r.quantity,
            created_at: r.created_at,
        }
    }
}

/// Input for creating a stock entry
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEntryInput {
    pub date: NaiveDate,
    pub product_id: Uuid,
    pub supplier: String,
    pub quantity: i64,
}

/// Input for a partial entry update
#[derive(Debug, Deserialize)]
pub struct UpdateEntryInput {
    pub date: Option<NaiveDate>,
    pub product_id: Option<Uuid>,
    pub supplier: Option<String>,
    pub quantity: Option<i64>,
}

const SELECT_COLUMNS: &str = "id, user_id, date, product_id, supplier, quantity, created_at";

impl EntryService {
    /// Create a new EntryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all entries for a user, newest first
    pub async fn list_entries(&self, user_id: Uuid) -> AppResult<Vec<StockEntry>> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {} FROM stock_entries WHERE user_id = $1 ORDER BY date DESC, created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StockEntry::from).collect())
    }

    /// List the entries for one product, newest first
    pub async fn list_entries_for_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Vec<StockEntry>> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            r#"
            SELECT {} FROM stock_entries
            WHERE user_id = $1 AND product_id = $2
            ORDER BY date DESC, created_at DESC
            "#,
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StockEntry::from).collect())
    }

    /// Record a stock entry
    pub async fn create_entry(
        &self,
        user_id: Uuid,
        input: CreateEntryInput,
    ) -> AppResult<StockEntry> {
        validate_entry_input(&input)?;
        self.ensure_product(user_id, input.product_id).await?;

        let row = sqlx::query_as::<_, EntryRow>(&format!(
            r#"
            INSERT INTO stock_entries (user_id, date, product_id, supplier, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .bind(input.date)
        .bind(input.product_id)
        .bind(input.supplier.trim())
        .bind(input.quantity)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Record several entries as one atomic batch
    ///
    /// Used by invoice import confirmation. Either every entry is stored or
    /// none are.
    pub async fn create_many(
        &self,
        user_id: Uuid,
        inputs: Vec<CreateEntryInput>,
    ) -> AppResult<Vec<StockEntry>> {
        for input in &inputs {
            validate_entry_input(input)?;
            self.ensure_product(user_id, input.product_id).await?;
        }

        let mut tx = self.db.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());

        for input in inputs {
            let row = sqlx::query_as::<_, EntryRow>(&format!(
                r#"
                INSERT INTO stock_entries (user_id, date, product_id, supplier, quantity)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {}
                "#,
                SELECT_COLUMNS
            ))
            .bind(user_id)
            .bind(input.date)
            .bind(input.product_id)
            .bind(input.supplier.trim())
            .bind(input.quantity)
            .fetch_one(&mut *tx)
            .await?;
            created.push(row.into());
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Merge the provided fields into an existing entry
    pub async fn update_entry(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
        input: UpdateEntryInput,
    ) -> AppResult<StockEntry> {
        let existing = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {} FROM stock_entries WHERE id = $1 AND user_id = $2",
            SELECT_COLUMNS
        ))
        .bind(entry_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Entry".to_string()))?;

        let date = input.date.unwrap_or(existing.date);
        let product_id = input.product_id.unwrap_or(existing.product_id);
        let supplier = input.supplier.unwrap_or(existing.supplier);
        let quantity = input.quantity.unwrap_or(existing.quantity);

        validation::validate_quantity(quantity)
            .map_err(|e| AppError::validation("quantity", e, "Quantidade inválida"))?;
        validation::validate_supplier(&supplier)
            .map_err(|e| AppError::validation("supplier", e, "Fornecedor inválido"))?;
        self.ensure_product(user_id, product_id).await?;

        let row = sqlx::query_as::<_, EntryRow>(&format!(
            r#"
            UPDATE stock_entries
            SET date = $1, product_id = $2, supplier = $3, quantity = $4
            WHERE id = $5 AND user_id = $6
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(date)
        .bind(product_id)
        .bind(supplier.trim())
        .bind(quantity)
        .bind(entry_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete an entry
    pub async fn delete_entry(&self, user_id: Uuid, entry_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM stock_entries WHERE id = $1 AND user_id = $2")
            .bind(entry_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Entry".to_string()));
        }
        Ok(())
    }

    async fn ensure_product(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1 AND user_id = $2)",
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Product".to_string()));
        }
        Ok(())
    }
}

fn validate_entry_input(input: &CreateEntryInput) -> AppResult<()> {
    validation::validate_quantity(input.quantity)
        .map_err(|e| AppError::validation("quantity", e, "Quantidade inválida"))?;
    validation::validate_supplier(&input.supplier)
        .map_err(|e| AppError::validation("supplier", e, "Fornecedor inválido"))?;
    Ok(())
}

// Database-backed tests; `sqlx::test` provisions a fresh database per test
// from DATABASE_URL and applies ./migrations.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::product::{CreateProductInput, ProductService};
    use rust_decimal::Decimal;

    async fn seed_product(pool: &PgPool, user: Uuid) -> Uuid {
        ProductService::new(pool.clone())
            .create_product(
                user,
                CreateProductInput {
                    name: "Luva".to_string(),
                    unit: "un".to_string(),
                    min_stock: 0,
                    price: Decimal::from(1),
                    consumption_unit: None,
                    consumption_rate: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    fn entry_for(product_id: Uuid, quantity: i64) -> CreateEntryInput {
        CreateEntryInput {
            date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            product_id,
            supplier: "Fornecedor".to_string(),
            quantity,
        }
    }

    #[sqlx::test]
    async fn create_many_assigns_an_id_to_every_entry(pool: PgPool) {
        let user = Uuid::new_v4();
        let product_id = seed_product(&pool, user).await;
        let service = EntryService::new(pool);

        let created = service
            .create_many(user, vec![entry_for(product_id, 5), entry_for(product_id, 7)])
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert_ne!(created[0].id, created[1].id);
        assert_eq!(service.list_entries(user).await.unwrap().len(), 2);
    }

    #[sqlx::test]
    async fn create_many_stores_nothing_when_one_product_is_unknown(pool: PgPool) {
        let user = Uuid::new_v4();
        let product_id = seed_product(&pool, user).await;
        let service = EntryService::new(pool);

        let result = service
            .create_many(
                user,
                vec![entry_for(product_id, 5), entry_for(Uuid::new_v4(), 7)],
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(service.list_entries(user).await.unwrap().is_empty());
    }
}
