// src/db/movement_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{MovementSums, NewMovement, StockMovement},
};

// O livro-razão: uma linha por entrada, saída ou descarte.
#[derive(Clone)]
pub struct MovementRepository {
    pool: PgPool,
}

impl MovementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        movement_id: Uuid,
    ) -> Result<Option<StockMovement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, StockMovement>(
            "SELECT * FROM stock_movements WHERE id = $1",
        )
        .bind(movement_id)
        .fetch_optional(executor)
        .await?;
        Ok(movement)
    }

    pub async fn list_for_item<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
    ) -> Result<Vec<StockMovement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT * FROM stock_movements
            WHERE item_id = $1
            ORDER BY moved_at DESC, created_at DESC
            "#,
        )
        .bind(item_id)
        .fetch_all(executor)
        .await?;
        Ok(movements)
    }

    /// Grava uma movimentação no livro-razão (auditoria).
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        movement: &NewMovement,
    ) -> Result<StockMovement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements
                (item_id, movement_type, quantity, unit_price, condition, purpose,
                 project, reason, ordered_by, received_by, is_rental, return_date,
                 moved_at, recorded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(movement.item_id)
        .bind(movement.movement_type)
        .bind(movement.quantity)
        .bind(movement.unit_price)
        .bind(movement.condition)
        .bind(movement.purpose.as_deref())
        .bind(movement.project.as_deref())
        .bind(movement.reason.as_deref())
        .bind(movement.ordered_by.as_deref())
        .bind(movement.received_by.as_deref())
        .bind(movement.is_rental)
        .bind(movement.return_date)
        .bind(movement.moved_at)
        .bind(movement.recorded_by)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    /// Somatórios por tipo desde o último fechamento (ou desde sempre,
    /// quando ainda não houve fechamento).
    pub async fn sums_since<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<MovementSums, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // SUM(BIGINT) vira NUMERIC no Postgres; o cast traz de volta.
        let sums = sqlx::query_as::<_, MovementSums>(
            r#"
            SELECT
                COALESCE(SUM(quantity) FILTER (WHERE movement_type = 'STOCK_IN'), 0)::BIGINT  AS stock_in,
                COALESCE(SUM(quantity) FILTER (WHERE movement_type = 'STOCK_OUT'), 0)::BIGINT AS stock_out,
                COALESCE(SUM(quantity) FILTER (WHERE movement_type = 'DISPOSAL'), 0)::BIGINT  AS disposal
            FROM stock_movements
            WHERE item_id = $1
              AND ($2::timestamptz IS NULL OR created_at > $2)
            "#,
        )
        .bind(item_id)
        .bind(since)
        .fetch_one(executor)
        .await?;
        Ok(sums)
    }

    /// Correção privilegiada: só quantidade e campos de texto livre.
    /// O ajuste do saldo do item é responsabilidade do service, na mesma
    /// transação.
    pub async fn update_correction<'e, E>(
        &self,
        executor: E,
        movement_id: Uuid,
        quantity: i64,
        purpose: Option<&str>,
        project: Option<&str>,
        reason: Option<&str>,
    ) -> Result<Option<StockMovement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, StockMovement>(
            r#"
            UPDATE stock_movements
            SET quantity = $2, purpose = $3, project = $4, reason = $5,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(movement_id)
        .bind(quantity)
        .bind(purpose)
        .bind(project)
        .bind(reason)
        .fetch_optional(executor)
        .await?;
        Ok(movement)
    }
}
