// src/models/inventory.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Item (catálogo + saldo) ---
// Diferente de um catálogo puro, o item carrega o saldo atual e a base do
// último fechamento: `current_quantity` é mantido por update condicional no
// banco e `closing_quantity` só muda no fechamento trimestral.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    #[schema(example = "Cabo de rede CAT6")]
    pub name: String,
    #[schema(example = "305m, azul")]
    pub specification: String,
    #[schema(example = "Furukawa")]
    pub maker: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    #[schema(example = "2500.00")]
    pub unit_price: Decimal,
    pub min_stock: i64,
    pub max_stock: i64,
    pub closing_quantity: i64,
    pub current_quantity: i64,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Valor total em estoque. Sempre recalculado na leitura, nunca gravado.
    pub fn total_amount(&self) -> Decimal {
        Decimal::from(self.current_quantity) * self.unit_price
    }
}

// --- 2. Tipos de movimentação ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "movement_type", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum MovementType {
    StockIn,  // Vira "STOCK_IN"
    StockOut, // Vira "STOCK_OUT"
    Disposal, // Vira "DISPOSAL"
}

// Estado qualitativo do material recebido (só entrada).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "condition_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionType {
    New,
    UsedGood,
    UsedDefective,
    Unknown,
}

impl ConditionType {
    /// Converte o rótulo livre que vem das planilhas para o enum.
    /// Rótulo que ninguém reconhece vira `Unknown` (nunca erro de importação).
    pub fn from_label(label: &str) -> ConditionType {
        let normalized = label
            .trim()
            .to_lowercase()
            .replace([' ', '_'], "-");

        match normalized.as_str() {
            "new" | "novo" | "nova" => ConditionType::New,
            "used-good" | "used" | "usado" | "usado-bom" => ConditionType::UsedGood,
            "used-defective" | "defective" | "defeituoso" | "usado-defeituoso" => {
                ConditionType::UsedDefective
            }
            _ => ConditionType::Unknown,
        }
    }
}

// --- 3. Movimentação (livro-razão) ---
// Uma linha por entrada, saída ou descarte. Imutável fora do fluxo de
// correção, que é restrito a níveis altos.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    pub item_id: Uuid,
    pub movement_type: MovementType,
    #[schema(example = 50)]
    pub quantity: i64,
    pub unit_price: Option<Decimal>,
    pub condition: Option<ConditionType>,
    pub purpose: Option<String>,
    pub project: Option<String>,
    pub reason: Option<String>,
    pub ordered_by: Option<String>,
    pub received_by: Option<String>,
    pub is_rental: bool,
    pub return_date: Option<NaiveDate>,
    pub moved_at: NaiveDate,
    #[schema(ignore)]
    pub recorded_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados de uma movimentação ainda não gravada. Montado pelo service,
// consumido pelo repositório.
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub item_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub unit_price: Option<Decimal>,
    pub condition: Option<ConditionType>,
    pub purpose: Option<String>,
    pub project: Option<String>,
    pub reason: Option<String>,
    pub ordered_by: Option<String>,
    pub received_by: Option<String>,
    pub is_rental: bool,
    pub return_date: Option<NaiveDate>,
    pub moved_at: NaiveDate,
    pub recorded_by: Uuid,
}

// Somatórios do livro-razão por tipo, usados na reconciliação.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct MovementSums {
    pub stock_in: i64,
    pub stock_out: i64,
    pub disposal: i64,
}

// --- 4. Situação de estoque (item + valor calculado) ---
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockStatus {
    #[serde(flatten)]
    pub item: Item,
    #[schema(example = "1125000.00")]
    pub total_amount: Decimal,
}

impl From<Item> for StockStatus {
    fn from(item: Item) -> Self {
        let total_amount = item.total_amount();
        StockStatus { item, total_amount }
    }
}

// --- 5. Reconciliação ---
// Compara o saldo gravado com o saldo recalculado a partir do livro-razão
// desde o último fechamento.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub item_id: Uuid,
    pub closing_quantity: i64,
    pub stock_in_total: i64,
    pub stock_out_total: i64,
    pub disposal_total: i64,
    pub stored_quantity: i64,
    pub reconciled_quantity: i64,
    pub consistent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_condition_labels_map_case_insensitively() {
        assert_eq!(ConditionType::from_label("New"), ConditionType::New);
        assert_eq!(ConditionType::from_label("  novo "), ConditionType::New);
        assert_eq!(ConditionType::from_label("USED GOOD"), ConditionType::UsedGood);
        assert_eq!(ConditionType::from_label("used_defective"), ConditionType::UsedDefective);
    }

    #[test]
    fn unknown_condition_labels_fall_back_to_unknown() {
        assert_eq!(ConditionType::from_label("???"), ConditionType::Unknown);
        assert_eq!(ConditionType::from_label(""), ConditionType::Unknown);
        assert_eq!(ConditionType::from_label("seminovo"), ConditionType::Unknown);
    }

    #[test]
    fn total_amount_is_quantity_times_price() {
        let item = sample_item(450, Decimal::new(250_000, 2)); // 2500.00
        assert_eq!(item.total_amount(), Decimal::new(112_500_000, 2)); // 1.125.000,00
    }

    fn sample_item(current_quantity: i64, unit_price: Decimal) -> Item {
        Item {
            id: Uuid::nil(),
            name: "Cabo de rede CAT6".into(),
            specification: "305m".into(),
            maker: "Furukawa".into(),
            category: None,
            unit: None,
            unit_price,
            min_stock: 0,
            max_stock: 0,
            closing_quantity: 500,
            current_quantity,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
