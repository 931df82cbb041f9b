// src/models/diary.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Registro do diário de obra. Texto livre, sem estrutura além dos filtros.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkDiaryEntry {
    pub id: Uuid,
    pub entry_date: NaiveDate,
    pub author_id: Uuid,
    #[schema(example = "Obra Bloco B")]
    pub project: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Agrupamento por projeto para a listagem lateral.
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectGroup {
    pub project: String,
    pub entry_count: i64,
    pub last_entry: Option<NaiveDate>,
}
