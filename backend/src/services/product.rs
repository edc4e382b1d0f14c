//! Product catalog service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::Product;
use shared::validation;

use crate::error::{AppError, AppResult};

/// Product service for catalog management
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Database row for a product
#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    unit: String,
    min_stock: i64,
    price: Decimal,
    consumption_unit: Option<String>,
    consumption_rate: Option<Decimal>,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            unit: r.unit,
            min_stock: r.min_stock,
            price: r.price,
            consumption_unit: r.consumption_unit,
            consumption_rate: r.consumption_rate,
            created_at: r.created_at,
        }
    }
}

/// Input for creating a product
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub unit: String,
    pub min_stock: i64,
    pub price: Decimal,
    pub consumption_unit: Option<String>,
    pub consumption_rate: Option<Decimal>,
}

/// Input for a partial product update
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub min_stock: Option<i64>,
    pub price: Option<Decimal>,
    pub consumption_unit: Option<Option<String>>,
    pub consumption_rate: Option<Option<Decimal>>,
}

const SELECT_COLUMNS: &str =
    "id, user_id, name, unit, min_stock, price, consumption_unit, consumption_rate, created_at";

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all products for a user, ordered by name
    pub async fn list_products(&self, user_id: Uuid) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE user_id = $1 ORDER BY name ASC",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a single product
    pub async fn get_product(&self, user_id: Uuid, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = $1 AND user_id = $2",
            SELECT_COLUMNS
        ))
        .bind(product_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// Create a product
    pub async fn create_product(
        &self,
        user_id: Uuid,
        input: CreateProductInput,
    ) -> AppResult<Product> {
        validate_product_input(&input)?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (user_id, name, unit, min_stock, price, consumption_unit, consumption_rate)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .bind(input.name.trim())
        .bind(input.unit.trim())
        .bind(input.min_stock)
        .bind(input.price)
        .bind(&input.consumption_unit)
        .bind(input.consumption_rate)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Create several products as one atomic batch
    ///
    /// Used by invoice import confirmation. Either all products are stored
    /// or none are.
    pub async fn create_many(
        &self,
        user_id: Uuid,
        inputs: Vec<CreateProductInput>,
    ) -> AppResult<Vec<Product>> {
        for input in &inputs {
            validate_product_input(input)?;
        }

        let mut tx = self.db.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());

        for input in inputs {
            let row = sqlx::query_as::<_, ProductRow>(&format!(
                r#"
                INSERT INTO products (user_id, name, unit, min_stock, price, consumption_unit, consumption_rate)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING {}
                "#,
                SELECT_COLUMNS
            ))
            .bind(user_id)
            .bind(input.name.trim())
            .bind(input.unit.trim())
            .bind(input.min_stock)
            .bind(input.price)
            .bind(&input.consumption_unit)
            .bind(input.consumption_rate)
            .fetch_one(&mut *tx)
            .await?;
            created.push(row.into());
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Merge the provided fields into an existing product
    pub async fn update_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        let existing = self.get_product(user_id, product_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let unit = input.unit.unwrap_or(existing.unit);
        let min_stock = input.min_stock.unwrap_or(existing.min_stock);
        let price = input.price.unwrap_or(existing.price);
        let consumption_unit = input
            .consumption_unit
            .unwrap_or(existing.consumption_unit);
        let consumption_rate = input
            .consumption_rate
            .unwrap_or(existing.consumption_rate);

        validation::validate_product_name(&name)
            .map_err(|e| AppError::validation("name", e, "Nome do produto inválido"))?;
        validation::validate_unit(&unit)
            .map_err(|e| AppError::validation("unit", e, "Unidade inválida"))?;
        validation::validate_min_stock(min_stock)
            .map_err(|e| AppError::validation("min_stock", e, "Estoque mínimo inválido"))?;
        validation::validate_price(price)
            .map_err(|e| AppError::validation("price", e, "Preço inválido"))?;
        validation::validate_consumption_params(consumption_unit.as_deref(), consumption_rate)
            .map_err(|e| {
                AppError::validation("consumption_rate", e, "Parâmetros de consumo inválidos")
            })?;

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET name = $1, unit = $2, min_stock = $3, price = $4,
                consumption_unit = $5, consumption_rate = $6
            WHERE id = $7 AND user_id = $8
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(name.trim())
        .bind(unit.trim())
        .bind(min_stock)
        .bind(price)
        .bind(&consumption_unit)
        .bind(consumption_rate)
        .bind(product_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// Delete a product together with every entry and exit referencing it
    ///
    /// The schema carries no foreign keys, so dependents are removed
    /// explicitly inside one transaction. All three deletes succeed or the
    /// whole operation rolls back.
    pub async fn delete_product_cascade(&self, user_id: Uuid, product_id: Uuid) -> AppResult<()> {
        // 404 before touching anything
        self.get_product(user_id, product_id).await?;

        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM stock_entries WHERE product_id = $1 AND user_id = $2")
            .bind(product_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM stock_exits WHERE product_id = $1 AND user_id = $2")
            .bind(product_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM products WHERE id = $1 AND user_id = $2")
            .bind(product_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Check that a product exists for this user
    pub async fn product_exists(&self, user_id: Uuid, product_id: Uuid) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1 AND user_id = $2)",
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(exists)
    }
}

fn validate_product_input(input: &CreateProductInput) -> AppResult<()> {
    validation::validate_product_name(&input.name)
        .map_err(|e| AppError::validation("name", e, "Nome do produto inválido"))?;
    validation::validate_unit(&input.unit)
        .map_err(|e| AppError::validation("unit", e, "Unidade inválida"))?;
    validation::validate_min_stock(input.min_stock)
        .map_err(|e| AppError::validation("min_stock", e, "Estoque mínimo inválido"))?;
    validation::validate_price(input.price)
        .map_err(|e| AppError::validation("price", e, "Preço inválido"))?;
    validation::validate_consumption_params(
        input.consumption_unit.as_deref(),
        input.consumption_rate,
    )
    .map_err(|e| AppError::validation("consumption_rate", e, "Parâmetros de consumo inválidos"))?;
    Ok(())
}

// Database-backed tests; `sqlx::test` provisions a fresh database per test
// from DATABASE_URL and applies ./migrations.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::entry::{CreateEntryInput, EntryService};
    use crate::services::exit::{CreateExitInput, ExitService};
    use chrono::NaiveDate;

    fn input(name: &str) -> CreateProductInput {
        CreateProductInput {
            name: name.to_string(),
            unit: "un".to_string(),
            min_stock: 0,
            price: Decimal::from(1),
            consumption_unit: None,
            consumption_rate: None,
        }
    }

    #[sqlx::test]
    async fn create_many_assigns_an_id_to_every_product(pool: PgPool) {
        let service = ProductService::new(pool);
        let user = Uuid::new_v4();

        let created = service
            .create_many(user, vec![input("Luva"), input("Gaze"), input("Seringa")])
            .await
            .unwrap();

        assert_eq!(created.len(), 3);
        assert_ne!(created[0].id, created[1].id);
        assert_ne!(created[1].id, created[2].id);
        assert_eq!(service.list_products(user).await.unwrap().len(), 3);
    }

    #[sqlx::test]
    async fn create_many_stores_nothing_when_one_row_is_invalid(pool: PgPool) {
        let service = ProductService::new(pool);
        let user = Uuid::new_v4();

        let result = service
            .create_many(user, vec![input("Luva"), input("   ")])
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
        assert!(service.list_products(user).await.unwrap().is_empty());
    }

    #[sqlx::test]
    async fn cascade_delete_leaves_no_movement_referencing_the_product(pool: PgPool) {
        let user = Uuid::new_v4();
        let products = ProductService::new(pool.clone());
        let entries = EntryService::new(pool.clone());
        let exits = ExitService::new(pool.clone());

        let kept = products.create_product(user, input("Gaze")).await.unwrap();
        let removed = products.create_product(user, input("Luva")).await.unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        for product_id in [kept.id, removed.id] {
            entries
                .create_entry(
                    user,
                    CreateEntryInput {
                        date,
                        product_id,
                        supplier: "Fornecedor".to_string(),
                        quantity: 5,
                    },
                )
                .await
                .unwrap();
            exits
                .create_exit(
                    user,
                    CreateExitInput {
                        date,
                        product_id,
                        quantity: 2,
                    },
                )
                .await
                .unwrap();
        }

        products.delete_product_cascade(user, removed.id).await.unwrap();

        let orphan_entries: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM stock_entries WHERE product_id = $1")
                .bind(removed.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        let orphan_exits: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM stock_exits WHERE product_id = $1")
                .bind(removed.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(orphan_entries, 0);
        assert_eq!(orphan_exits, 0);
        assert!(!products.product_exists(user, removed.id).await.unwrap());

        // the sibling product keeps its history
        let kept_entries = entries.list_entries_for_product(user, kept.id).await.unwrap();
        let kept_exits = exits.list_exits_for_product(user, kept.id).await.unwrap();
        assert_eq!(kept_entries.len(), 1);
        assert_eq!(kept_exits.len(), 1);
    }

    #[sqlx::test]
    async fn cascade_delete_of_missing_product_is_not_found(pool: PgPool) {
        let service = ProductService::new(pool);
        let result = service
            .delete_product_cascade(Uuid::new_v4(), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
