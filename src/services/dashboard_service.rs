// src/services/dashboard_service.rs

use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::dashboard::{DashboardSummary, LowStockItem, RecentMovement},
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    pub async fn get_summary<'e, E>(&self, executor: E) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        self.repo.get_summary(executor).await
    }

    pub async fn recent_movements<'e, E>(
        &self,
        executor: E,
        limit: i64,
    ) -> Result<Vec<RecentMovement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.recent_movements(executor, limit).await
    }

    pub async fn low_stock_items<'e, E>(&self, executor: E) -> Result<Vec<LowStockItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.low_stock_items(executor).await
    }
}
