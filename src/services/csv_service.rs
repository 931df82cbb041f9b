// src/services/csv_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ItemRepository,
    models::inventory::{ConditionType, StockStatus},
    services::stock_service::{validate_unit_price, StockInDraft, StockService},
};

// Colunas fixas da planilha de entrada, nesta ordem.
pub const IMPORT_HEADERS: [&str; 11] = [
    "name",
    "specification",
    "maker",
    "unit_price",
    "purpose",
    "quantity",
    "condition",
    "reason",
    "ordered_by",
    "received_by",
    "received_date",
];

// ---
// Parsing puro (sem banco)
// ---

/// Data da planilha nos formatos aceitos; data inválida cai na data de hoje,
/// com aviso no log. Comportamento herdado do sistema antigo e mantido de
/// propósito — ver DESIGN.md.
fn parse_received_date(raw: &str, today: NaiveDate, line: usize) -> NaiveDate {
    let trimmed = raw.trim();
    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date;
        }
    }
    tracing::warn!(
        "Linha {}: data de recebimento '{}' inválida, usando a data de hoje",
        line,
        trimmed
    );
    today
}

fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn row_error(line: usize, message: impl Into<String>) -> AppError {
    AppError::CsvImport {
        line,
        message: message.into(),
    }
}

/// Lê e valida a planilha INTEIRA antes de qualquer escrita. Qualquer linha
/// ruim rejeita o arquivo todo com o número da linha — nada de importação
/// pela metade.
pub fn parse_stock_in_csv(
    content: &str,
    today: NaiveDate,
) -> Result<Vec<StockInDraft>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    if headers != IMPORT_HEADERS {
        return Err(row_error(
            1,
            format!("cabeçalho esperado: {}", IMPORT_HEADERS.join(",")),
        ));
    }

    let mut drafts = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let line = index + 2; // linha 1 é o cabeçalho
        let record = record.map_err(|e| row_error(line, e.to_string()))?;

        let field = |column: usize| record.get(column).unwrap_or("");

        let name = field(0).trim().to_string();
        if name.is_empty() {
            return Err(row_error(line, "o nome do item é obrigatório"));
        }

        let unit_price: Decimal = field(3)
            .trim()
            .parse()
            .map_err(|_| row_error(line, format!("preço unitário inválido: '{}'", field(3))))?;
        validate_unit_price(unit_price)
            .map_err(|_| row_error(line, "preço unitário fora do limite permitido"))?;

        let quantity: i64 = field(5)
            .trim()
            .parse()
            .map_err(|_| row_error(line, format!("quantidade inválida: '{}'", field(5))))?;
        if quantity <= 0 {
            return Err(row_error(line, "a quantidade deve ser maior que zero"));
        }

        drafts.push(StockInDraft {
            item_id: None,
            name: Some(name),
            specification: field(1).trim().to_string(),
            maker: field(2).trim().to_string(),
            category: None,
            unit: None,
            quantity,
            unit_price,
            condition: ConditionType::from_label(field(6)),
            purpose: optional(field(4)),
            reason: optional(field(7)),
            ordered_by: optional(field(8)),
            received_by: optional(field(9)),
            moved_at: parse_received_date(field(10), today, line),
        });
    }

    if drafts.is_empty() {
        return Err(row_error(1, "a planilha não tem nenhuma linha de dados"));
    }

    Ok(drafts)
}

/// Situação do estoque em CSV, com o valor total calculado na hora.
pub fn render_stock_csv(statuses: &[StockStatus]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "name",
        "specification",
        "maker",
        "category",
        "unit",
        "unit_price",
        "min_stock",
        "max_stock",
        "closing_quantity",
        "current_quantity",
        "total_amount",
    ])?;

    for status in statuses {
        let item = &status.item;
        writer.write_record([
            item.name.clone(),
            item.specification.clone(),
            item.maker.clone(),
            item.category.clone().unwrap_or_default(),
            item.unit.clone().unwrap_or_default(),
            item.unit_price.to_string(),
            item.min_stock.to_string(),
            item.max_stock.to_string(),
            item.closing_quantity.to_string(),
            item.current_quantity.to_string(),
            status.total_amount.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::InternalServerError(anyhow::anyhow!(e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::InternalServerError(anyhow::anyhow!(e)))
}

// ---
// Service (banco)
// ---

#[derive(Clone)]
pub struct CsvService {
    stock_service: StockService,
    item_repo: ItemRepository,
}

impl CsvService {
    pub fn new(stock_service: StockService, item_repo: ItemRepository) -> Self {
        Self {
            stock_service,
            item_repo,
        }
    }

    /// Importação em massa: valida tudo, depois aplica tudo dentro de UMA
    /// transação. Se qualquer linha falhar na aplicação, nada fica gravado.
    pub async fn import_stock_in<'e, E>(
        &self,
        executor: E,
        content: &str,
        today: NaiveDate,
        recorded_by: Uuid,
    ) -> Result<usize, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let drafts = parse_stock_in_csv(content, today)?;

        let mut tx = executor.begin().await?;
        for draft in &drafts {
            self.stock_service
                .record_stock_in(&mut *tx, draft, recorded_by)
                .await?;
        }
        tx.commit().await?;

        tracing::info!("Planilha importada: {} entradas aplicadas", drafts.len());
        Ok(drafts.len())
    }

    pub async fn export_stock<'e, E>(&self, executor: E) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let statuses: Vec<StockStatus> = self
            .item_repo
            .list_all(executor)
            .await?
            .into_iter()
            .map(StockStatus::from)
            .collect();
        render_stock_csv(&statuses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 5).unwrap()
    }

    const GOOD_ROW: &str = "Cabo de rede CAT6,305m,Furukawa,2500.00,Obra Bloco B,10,new,,Ana,Bruno,2025-08-01";

    fn csv_with(rows: &[&str]) -> String {
        let mut content = IMPORT_HEADERS.join(",");
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        content
    }

    #[test]
    fn a_well_formed_sheet_parses_into_drafts() {
        let content = csv_with(&[GOOD_ROW]);
        let drafts = parse_stock_in_csv(&content, today()).unwrap();

        assert_eq!(drafts.len(), 1);
        let draft = &drafts[0];
        assert_eq!(draft.name.as_deref(), Some("Cabo de rede CAT6"));
        assert_eq!(draft.quantity, 10);
        assert_eq!(draft.condition, ConditionType::New);
        assert_eq!(draft.moved_at, NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
        assert_eq!(draft.received_by.as_deref(), Some("Bruno"));
        assert_eq!(draft.reason, None);
    }

    #[test]
    fn an_unparseable_date_falls_back_to_today_not_to_failure() {
        let row = "Parafuso,M6,ACME,0.50,,100,novo,,Ana,Bruno,13/13/2024";
        let drafts = parse_stock_in_csv(&csv_with(&[row]), today()).unwrap();
        assert_eq!(drafts[0].moved_at, today());
    }

    #[test]
    fn a_zero_quantity_row_rejects_the_whole_sheet() {
        let bad = "Parafuso,M6,ACME,0.50,,0,novo,,Ana,Bruno,2025-08-01";
        let result = parse_stock_in_csv(&csv_with(&[GOOD_ROW, bad, GOOD_ROW]), today());

        // Nada vira draft: sem drafts, nada é gravado — tudo ou nada.
        match result.unwrap_err() {
            AppError::CsvImport { line, .. } => assert_eq!(line, 3),
            other => panic!("esperava CsvImport, veio {other:?}"),
        }
    }

    #[test]
    fn a_wrong_header_is_rejected_at_line_one() {
        let content = "nome,esp,fab\nParafuso,M6,ACME";
        match parse_stock_in_csv(content, today()).unwrap_err() {
            AppError::CsvImport { line, .. } => assert_eq!(line, 1),
            other => panic!("esperava CsvImport, veio {other:?}"),
        }
    }

    #[test]
    fn unknown_condition_labels_become_unknown() {
        let row = "Parafuso,M6,ACME,0.50,,5,sei lá,,Ana,Bruno,2025-08-01";
        let drafts = parse_stock_in_csv(&csv_with(&[row]), today()).unwrap();
        assert_eq!(drafts[0].condition, ConditionType::Unknown);
    }

    #[test]
    fn export_recomputes_the_total_amount_column() {
        use crate::models::inventory::Item;

        let created = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();
        let item = Item {
            id: Uuid::nil(),
            name: "Cabo de rede CAT6".into(),
            specification: "305m".into(),
            maker: "Furukawa".into(),
            category: None,
            unit: Some("cx".into()),
            unit_price: Decimal::new(250_000, 2),
            min_stock: 10,
            max_stock: 900,
            closing_quantity: 500,
            current_quantity: 450,
            deleted_at: None,
            created_at: created,
            updated_at: created,
        };

        let rendered = render_stock_csv(&[StockStatus::from(item)]).unwrap();
        assert!(rendered.starts_with("name,specification"));
        assert!(rendered.contains("1125000.00"));
    }
}
