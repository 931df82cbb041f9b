// src/db/closing_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::closing::{AnnualClosing, Closing},
};

#[derive(Clone)]
pub struct ClosingRepository {
    pool: PgPool,
}

impl ClosingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Refechar dentro da mesma janela atualiza a linha existente.
    pub async fn upsert_closing<'e, E>(
        &self,
        executor: E,
        year: i32,
        quarter: i16,
        closing_date: NaiveDate,
        closed_by: Uuid,
    ) -> Result<Closing, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let closing = sqlx::query_as::<_, Closing>(
            r#"
            INSERT INTO closings (year, quarter, closing_date, closed_by)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (year, quarter)
            DO UPDATE SET
                closing_date = EXCLUDED.closing_date,
                closed_by = EXCLUDED.closed_by
            RETURNING *
            "#,
        )
        .bind(year)
        .bind(quarter)
        .bind(closing_date)
        .bind(closed_by)
        .fetch_one(executor)
        .await?;
        Ok(closing)
    }

    // No refechamento as fotos antigas saem antes das novas entrarem.
    pub async fn delete_snapshots<'e, E>(
        &self,
        executor: E,
        closing_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM closing_snapshots WHERE closing_id = $1")
            .bind(closing_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Fotografa a quantidade atual de todos os itens vivos de uma vez.
    pub async fn snapshot_items<'e, E>(
        &self,
        executor: E,
        closing_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO closing_snapshots (closing_id, item_id, quantity)
            SELECT $1, id, current_quantity
            FROM items
            WHERE deleted_at IS NULL
            "#,
        )
        .bind(closing_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_quarters<'e, E>(&self, executor: E, year: i32) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM closings WHERE year = $1",
        )
        .bind(year)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    pub async fn upsert_annual<'e, E>(
        &self,
        executor: E,
        year: i32,
        closed_by: Uuid,
    ) -> Result<AnnualClosing, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let annual = sqlx::query_as::<_, AnnualClosing>(
            r#"
            INSERT INTO annual_closings (year, closed_by)
            VALUES ($1, $2)
            ON CONFLICT (year)
            DO UPDATE SET closed_by = EXCLUDED.closed_by, closed_at = now()
            RETURNING *
            "#,
        )
        .bind(year)
        .bind(closed_by)
        .fetch_one(executor)
        .await?;
        Ok(annual)
    }

    pub async fn list_closings<'e, E>(&self, executor: E) -> Result<Vec<Closing>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let closings = sqlx::query_as::<_, Closing>(
            "SELECT * FROM closings ORDER BY year DESC, quarter DESC",
        )
        .fetch_all(executor)
        .await?;
        Ok(closings)
    }

    pub async fn list_annual<'e, E>(&self, executor: E) -> Result<Vec<AnnualClosing>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let annual = sqlx::query_as::<_, AnnualClosing>(
            "SELECT * FROM annual_closings ORDER BY year DESC",
        )
        .fetch_all(executor)
        .await?;
        Ok(annual)
    }

    /// O fechamento mais recente define desde quando a reconciliação soma
    /// movimentações. Substitui o 'localStorage' do sistema antigo.
    pub async fn last_closing<'e, E>(&self, executor: E) -> Result<Option<Closing>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let closing = sqlx::query_as::<_, Closing>(
            "SELECT * FROM closings ORDER BY created_at DESC LIMIT 1",
        )
        .fetch_optional(executor)
        .await?;
        Ok(closing)
    }
}
