// src/models/dashboard.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::inventory::MovementType;

// 1. Resumo geral (os cards do topo)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub item_count: i64,         // Itens vivos no catálogo
    pub total_stock_value: Decimal, // Σ quantidade × preço unitário
    pub low_stock_count: i64,    // Itens no mínimo ou abaixo
    pub movements_today: i64,    // Movimentações registradas hoje
}

// 2. Últimas movimentações (com o nome do item já resolvido)
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentMovement {
    pub id: Uuid,
    pub item_name: String,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub moved_at: NaiveDate,
    pub created_at: DateTime<Utc>,
}

// 3. Itens abaixo do estoque mínimo
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
    pub id: Uuid,
    pub name: String,
    pub specification: String,
    pub current_quantity: i64,
    pub min_stock: i64,
}
