//! Stock exit service for outbound movements

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::StockExit;
use shared::validation;

use crate::error::{AppError, AppResult};

/// Exit service for recording outbound stock
#[derive(Clone)]
pub struct ExitService {
    db: PgPool,
}

/// Database row for a stock exit
#[derive(Debug, FromRow)]
struct ExitRow {
    id: Uuid,
    user_id: Uuid,
    date: NaiveDate,
    product_id: Uuid,
    quantity: i64,
    created_at: DateTime<Utc>,
}

impl From<ExitRow> for StockExit {
    fn from(r: ExitRow) -> Self {
        StockExit {
            id: r.id,
            user_id: r.user_id,
            date: r.date,
            product_id: r.product_id,
            quantity: r.quantity,
            created_at: r.created_at,
        }
    }
}

/// Input for creating a stock exit
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExitInput {
    pub date: NaiveDate,
    pub product_id: Uuid,
    pub quantity: i64,
}

/// Input for a partial exit update
#[derive(Debug, Deserialize)]
pub struct UpdateExitInput {
    pub date: Option<NaiveDate>,
    pub product_id: Option<Uuid>,
    pub quantity: Option<i64>,
}

const SELECT_COLUMNS: &str = "id, user_id, date, product_id, quantity, created_at";

impl ExitService {
    /// Create a new ExitService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all exits for a user, newest first
    pub async fn list_exits(&self, user_id: Uuid) -> AppResult<Vec<StockExit>> {
        let rows = sqlx::query_as::<_, ExitRow>(&format!(
            "SELECT {} FROM stock_exits WHERE user_id = $1 ORDER BY date DESC, created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StockExit::from).collect())
    }

    /// List the exits for one product, newest first
    pub async fn list_exits_for_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Vec<StockExit>> {
        let rows = sqlx::query_as::<_, ExitRow>(&format!(
            r#"
            SELECT {} FROM stock_exits
            WHERE user_id = $1 AND product_id = $2
            ORDER BY date DESC, created_at DESC
            "#,
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StockExit::from).collect())
    }

    /// Record a stock exit
    ///
    /// No balance check is performed: an exit larger than the current
    /// balance is accepted and shows up as a negative balance in the stock
    /// view, keeping the mistake visible to the operator.
    pub async fn create_exit(&self, user_id: Uuid, input: CreateExitInput) -> AppResult<StockExit> {
        validation::validate_quantity(input.quantity)
            .map_err(|e| AppError::validation("quantity", e, "Quantidade inválida"))?;
        self.ensure_product(user_id, input.product_id).await?;

        let row = sqlx::query_as::<_, ExitRow>(&format!(
            r#"
            INSERT INTO stock_exits (user_id, date, product_id, quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .bind(input.date)
        .bind(input.product_id)
        .bind(input.quantity)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Merge the provided fields into an existing exit
    pub async fn update_exit(
        &self,
        user_id: Uuid,
        exit_id: Uuid,
        input: UpdateExitInput,
    ) -> AppResult<StockExit> {
        let existing = sqlx::query_as::<_, ExitRow>(&format!(
            "SELECT {} FROM stock_exits WHERE id = $1 AND user_id = $2",
            SELECT_COLUMNS
        ))
        .bind(exit_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Exit".to_string()))?;

        let date = input.date.unwrap_or(existing.date);
        let product_id = input.product_id.unwrap_or(existing.product_id);
        let quantity = input.quantity.unwrap_or(existing.quantity);

        validation::validate_quantity(quantity)
            .map_err(|e| AppError::validation("quantity", e, "Quantidade inválida"))?;
        self.ensure_product(user_id, product_id).await?;

        let row = sqlx::query_as::<_, ExitRow>(&format!(
            r#"
            UPDATE stock_exits
            SET date = $1, product_id = $2, quantity = $3
            WHERE id = $4 AND user_id = $5
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(date)
        .bind(product_id)
        .bind(quantity)
        .bind(exit_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete an exit
    pub async fn delete_exit(&self, user_id: Uuid, exit_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM stock_exits WHERE id = $1 AND user_id = $2")
            .bind(exit_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Exit".to_string()));
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
