// src/db/item_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::inventory::Item};

#[derive(Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<Item>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE deleted_at IS NULL ORDER BY name ASC, specification ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
    ) -> Result<Option<Item>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(item_id)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    // A identidade de catálogo é a tripla (nome, especificação, fabricante).
    pub async fn find_by_identity<'e, E>(
        &self,
        executor: E,
        name: &str,
        specification: &str,
        maker: &str,
    ) -> Result<Option<Item>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT * FROM items
            WHERE name = $1 AND specification = $2 AND maker = $3
              AND deleted_at IS NULL
            "#,
        )
        .bind(name)
        .bind(specification)
        .bind(maker)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    pub async fn count_live<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM items WHERE deleted_at IS NULL",
        )
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    // ---
    // Escrita
    // ---

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        specification: &str,
        maker: &str,
        category: Option<&str>,
        unit: Option<&str>,
        unit_price: Decimal,
        min_stock: i64,
        max_stock: i64,
    ) -> Result<Item, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items
                (name, specification, maker, category, unit, unit_price, min_stock, max_stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(specification)
        .bind(maker)
        .bind(category)
        .bind(unit)
        .bind(unit_price)
        .bind(min_stock)
        .bind(max_stock)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    let constraint = db_err.constraint().unwrap_or_default();
                    return AppError::UniqueConstraintViolation(constraint.to_string());
                }
            }
            e.into()
        })
    }

    // Edição de cadastro (nunca mexe no saldo).
    pub async fn update_details<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        name: &str,
        specification: &str,
        maker: &str,
        category: Option<&str>,
        unit: Option<&str>,
        unit_price: Decimal,
        min_stock: i64,
        max_stock: i64,
    ) -> Result<Option<Item>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET name = $2, specification = $3, maker = $4, category = $5, unit = $6,
                unit_price = $7, min_stock = $8, max_stock = $9, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(name)
        .bind(specification)
        .bind(maker)
        .bind(category)
        .bind(unit)
        .bind(unit_price)
        .bind(min_stock)
        .bind(max_stock)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    /// Entrada: soma no saldo. Sempre funciona (estoque só cresce aqui).
    pub async fn credit_quantity<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        quantity: i64,
        unit_price: Decimal,
    ) -> Result<Option<Item>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // A entrada também atualiza o preço unitário de referência do item.
        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET current_quantity = current_quantity + $2,
                unit_price = $3,
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(quantity)
        .bind(unit_price)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    /// Saída/descarte: decremento condicional e atômico no banco.
    /// `None` = saldo insuficiente (a cláusula WHERE não casou). É isso que
    /// impede o saldo negativo mesmo com duas sessões competindo.
    pub async fn debit_quantity<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        quantity: i64,
    ) -> Result<Option<Item>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET current_quantity = current_quantity - $2,
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
              AND current_quantity >= $2
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(quantity)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    /// Correção: aplica um delta (positivo ou negativo) com a mesma guarda
    /// de não-negatividade.
    pub async fn shift_quantity<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        delta: i64,
    ) -> Result<Option<Item>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET current_quantity = current_quantity + $2,
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
              AND current_quantity + $2 >= 0
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(delta)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    // Remoção em massa: só marca deleted_at, nunca apaga de verdade.
    pub async fn soft_delete_many<'e, E>(
        &self,
        executor: E,
        item_ids: &[Uuid],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET deleted_at = now(), updated_at = now()
            WHERE id = ANY($1) AND deleted_at IS NULL
            "#,
        )
        .bind(item_ids)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Fechamento: a quantidade atual vira a nova base de todos os itens.
    pub async fn rebase_closing_quantities<'e, E>(&self, executor: E) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET closing_quantity = current_quantity, updated_at = now()
            WHERE deleted_at IS NULL
            "#,
        )
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
