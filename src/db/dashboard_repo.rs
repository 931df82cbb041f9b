// src/db/dashboard_repo.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::dashboard::{DashboardSummary, LowStockItem, RecentMovement},
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Resumo Geral
    pub async fn get_summary<'e, E>(&self, executor: E) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Uma transação para as quatro contagens saírem do mesmo instante.
        let mut tx = executor.begin().await?;

        let item_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM items WHERE deleted_at IS NULL",
        )
        .fetch_one(&mut *tx)
        .await?;

        // Valor total em estoque: Σ quantidade × preço. Calculado na leitura,
        // nunca gravado.
        let total_stock_value = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(current_quantity * unit_price), 0)
            FROM items
            WHERE deleted_at IS NULL
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        let low_stock_count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM items
            WHERE deleted_at IS NULL
              AND min_stock > 0
              AND current_quantity <= min_stock
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        let movements_today = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM stock_movements WHERE created_at::date = CURRENT_DATE",
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardSummary {
            item_count,
            total_stock_value,
            low_stock_count,
            movements_today,
        })
    }

    // 2. Últimas movimentações (com nome do item resolvido)
    pub async fn recent_movements<'e, E>(
        &self,
        executor: E,
        limit: i64,
    ) -> Result<Vec<RecentMovement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, RecentMovement>(
            r#"
            SELECT m.id, i.name AS item_name, m.movement_type, m.quantity,
                   m.moved_at, m.created_at
            FROM stock_movements m
            JOIN items i ON i.id = m.item_id
            ORDER BY m.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    // 3. Itens no estoque mínimo ou abaixo
    pub async fn low_stock_items<'e, E>(&self, executor: E) -> Result<Vec<LowStockItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, LowStockItem>(
            r#"
            SELECT id, name, specification, current_quantity, min_stock
            FROM items
            WHERE deleted_at IS NULL
              AND min_stock > 0
              AND current_quantity <= min_stock
            ORDER BY name ASC
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}
