// src/models/closing.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Fechamento de um trimestre: uma linha por (ano, trimestre).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Closing {
    pub id: Uuid,
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 2)]
    pub quarter: i16,
    pub closing_date: NaiveDate,
    #[schema(ignore)]
    pub closed_by: Uuid,
    pub created_at: DateTime<Utc>,
}

// Foto da quantidade de um item no momento do fechamento.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClosingSnapshot {
    pub id: Uuid,
    pub closing_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

// Fechamento anual: só marca o ano, não mexe em número nenhum.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnualClosing {
    pub id: Uuid,
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(ignore)]
    pub closed_by: Uuid,
    pub closed_at: DateTime<Utc>,
}

// Histórico completo para a tela de fechamentos.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClosingHistory {
    pub quarters: Vec<Closing>,
    pub annual: Vec<AnnualClosing>,
}
