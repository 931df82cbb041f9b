// src/services/stock_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{validation_error, AppError},
    db::{ClosingRepository, ItemRepository, MovementRepository},
    models::inventory::{
        ConditionType, Item, MovementSums, MovementType, NewMovement, ReconciliationReport,
        StockMovement, StockStatus,
    },
};

/// Teto do preço unitário: 999.999.999.999,99 (NUMERIC(14,2) no banco).
/// Acima disso é erro de validação, nunca estouro silencioso.
pub fn max_unit_price() -> Decimal {
    Decimal::new(99_999_999_999_999, 2)
}

// ---
// Regras puras (sem banco). São elas que os testes exercitam.
// ---

pub fn validate_quantity(quantity: i64) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(validation_error(
            "quantity",
            "range",
            "A quantidade deve ser maior que zero.",
        ));
    }
    Ok(())
}

pub fn validate_unit_price(unit_price: Decimal) -> Result<(), AppError> {
    if unit_price.is_sign_negative() {
        return Err(validation_error(
            "unitPrice",
            "range",
            "O preço unitário não pode ser negativo.",
        ));
    }
    if unit_price > max_unit_price() {
        return Err(validation_error(
            "unitPrice",
            "range",
            "O preço unitário passou do limite de 999.999.999.999,99.",
        ));
    }
    Ok(())
}

/// Pré-checagem amigável. Igual ao disponível passa; um a mais é recusado.
/// A autoridade final é o decremento condicional no banco — se outra sessão
/// ganhar a corrida entre esta checagem e o UPDATE, o UPDATE recusa igual.
pub fn ensure_sufficient(available: i64, requested: i64) -> Result<(), AppError> {
    if requested > available {
        return Err(AppError::InsufficientStock {
            available,
            requested,
        });
    }
    Ok(())
}

/// Saldo recalculado do livro-razão: base do fechamento + entradas − saídas
/// − descartes. Função pura da soma das movimentações, sem estado escondido.
pub fn reconciled_quantity(closing_quantity: i64, sums: &MovementSums) -> i64 {
    closing_quantity + sums.stock_in - sums.stock_out - sums.disposal
}

/// Empréstimo sem data de devolução prevista não entra.
pub fn validate_rental(is_rental: bool, return_date: Option<NaiveDate>) -> Result<(), AppError> {
    if is_rental && return_date.is_none() {
        return Err(validation_error(
            "returnDate",
            "required",
            "Saída por empréstimo precisa da data prevista de devolução.",
        ));
    }
    Ok(())
}

// Dados de uma entrada ainda não aplicada. Vem do handler ou de uma linha
// de planilha; os dois caminhos convergem aqui.
#[derive(Debug, Clone)]
pub struct StockInDraft {
    pub item_id: Option<Uuid>,
    pub name: Option<String>,
    pub specification: String,
    pub maker: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub condition: ConditionType,
    pub purpose: Option<String>,
    pub reason: Option<String>,
    pub ordered_by: Option<String>,
    pub received_by: Option<String>,
    pub moved_at: NaiveDate,
}

impl StockInDraft {
    fn validate(&self) -> Result<(), AppError> {
        validate_quantity(self.quantity)?;
        validate_unit_price(self.unit_price)?;
        if self.item_id.is_none() {
            let name_ok = self
                .name
                .as_deref()
                .map(|n| !n.trim().is_empty())
                .unwrap_or(false);
            if !name_ok {
                return Err(validation_error(
                    "name",
                    "required",
                    "O nome do item é obrigatório para criar um item novo.",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct StockService {
    item_repo: ItemRepository,
    movement_repo: MovementRepository,
    closing_repo: ClosingRepository,
}

impl StockService {
    pub fn new(
        item_repo: ItemRepository,
        movement_repo: MovementRepository,
        closing_repo: ClosingRepository,
    ) -> Self {
        Self {
            item_repo,
            movement_repo,
            closing_repo,
        }
    }

    // ---
    // Leitura
    // ---

    pub async fn list_stock_status<'e, E>(&self, executor: E) -> Result<Vec<StockStatus>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = self.item_repo.list_all(executor).await?;
        Ok(items.into_iter().map(StockStatus::from).collect())
    }

    pub async fn get_stock_status<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
    ) -> Result<StockStatus, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = self
            .item_repo
            .find_by_id(executor, item_id)
            .await?
            .ok_or(AppError::ItemNotFound)?;
        Ok(StockStatus::from(item))
    }

    pub async fn list_movements<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
    ) -> Result<Vec<StockMovement>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        self.item_repo
            .find_by_id(&mut *tx, item_id)
            .await?
            .ok_or(AppError::ItemNotFound)?;
        let movements = self.movement_repo.list_for_item(&mut *tx, item_id).await?;
        tx.commit().await?;
        Ok(movements)
    }

    /// Compara o saldo gravado com o saldo recalculado do livro-razão desde
    /// o último fechamento.
    pub async fn reconcile_item<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
    ) -> Result<ReconciliationReport, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let item = self
            .item_repo
            .find_by_id(&mut *tx, item_id)
            .await?
            .ok_or(AppError::ItemNotFound)?;

        let since = self
            .closing_repo
            .last_closing(&mut *tx)
            .await?
            .map(|closing| closing.created_at);

        let sums = self
            .movement_repo
            .sums_since(&mut *tx, item_id, since)
            .await?;

        tx.commit().await?;

        let recomputed = reconciled_quantity(item.closing_quantity, &sums);
        Ok(ReconciliationReport {
            item_id,
            closing_quantity: item.closing_quantity,
            stock_in_total: sums.stock_in,
            stock_out_total: sums.stock_out,
            disposal_total: sums.disposal,
            stored_quantity: item.current_quantity,
            reconciled_quantity: recomputed,
            consistent: recomputed == item.current_quantity,
        })
    }

    // ---
    // Escrita
    // ---

    // --- ENTRADA ---
    pub async fn record_stock_in<'e, E>(
        &self,
        executor: E,
        draft: &StockInDraft,
        recorded_by: Uuid,
    ) -> Result<(Item, StockMovement), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        draft.validate()?;

        let mut tx = executor.begin().await?;

        // 1. Resolve o item: id direto, tripla já cadastrada, ou item novo.
        let item = match draft.item_id {
            Some(item_id) => self
                .item_repo
                .find_by_id(&mut *tx, item_id)
                .await?
                .ok_or(AppError::ItemNotFound)?,
            None => {
                let name = draft.name.as_deref().unwrap_or_default();
                let existing = self
                    .item_repo
                    .find_by_identity(&mut *tx, name, &draft.specification, &draft.maker)
                    .await?;
                match existing {
                    Some(item) => item,
                    None => {
                        self.item_repo
                            .create(
                                &mut *tx,
                                name,
                                &draft.specification,
                                &draft.maker,
                                draft.category.as_deref(),
                                draft.unit.as_deref(),
                                draft.unit_price,
                                0,
                                0,
                            )
                            .await?
                    }
                }
            }
        };

        // 2. Soma no saldo (e atualiza o preço de referência).
        let updated = self
            .item_repo
            .credit_quantity(&mut *tx, item.id, draft.quantity, draft.unit_price)
            .await?
            .ok_or(AppError::ItemNotFound)?;

        // 3. Grava no livro-razão.
        let movement = self
            .movement_repo
            .insert(
                &mut *tx,
                &NewMovement {
                    item_id: item.id,
                    movement_type: MovementType::StockIn,
                    quantity: draft.quantity,
                    unit_price: Some(draft.unit_price),
                    condition: Some(draft.condition),
                    purpose: draft.purpose.clone(),
                    project: None,
                    reason: draft.reason.clone(),
                    ordered_by: draft.ordered_by.clone(),
                    received_by: draft.received_by.clone(),
                    is_rental: false,
                    return_date: None,
                    moved_at: draft.moved_at,
                    recorded_by,
                },
            )
            .await?;

        tx.commit().await?;
        Ok((updated, movement))
    }

    // --- SAÍDA ---
    pub async fn record_stock_out<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        quantity: i64,
        is_rental: bool,
        return_date: Option<NaiveDate>,
        project: Option<&str>,
        purpose: Option<&str>,
        moved_at: NaiveDate,
        recorded_by: Uuid,
    ) -> Result<(Item, StockMovement), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        validate_quantity(quantity)?;
        validate_rental(is_rental, return_date)?;

        let mut tx = executor.begin().await?;

        let item = self
            .item_repo
            .find_by_id(&mut *tx, item_id)
            .await?
            .ok_or(AppError::ItemNotFound)?;

        // Pré-checagem para o erro sair com os números certos.
        ensure_sufficient(item.current_quantity, quantity)?;

        // Decremento condicional: é ele que segura a corrida entre sessões.
        let updated = self
            .item_repo
            .debit_quantity(&mut *tx, item_id, quantity)
            .await?
            .ok_or(AppError::InsufficientStock {
                available: item.current_quantity,
                requested: quantity,
            })?;

        let movement = self
            .movement_repo
            .insert(
                &mut *tx,
                &NewMovement {
                    item_id,
                    movement_type: MovementType::StockOut,
                    quantity,
                    unit_price: None,
                    condition: None,
                    purpose: purpose.map(str::to_string),
                    project: project.map(str::to_string),
                    reason: None,
                    ordered_by: None,
                    received_by: None,
                    is_rental,
                    return_date,
                    moved_at,
                    recorded_by,
                },
            )
            .await?;

        tx.commit().await?;
        Ok((updated, movement))
    }

    // --- DESCARTE ---
    pub async fn record_disposal<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        quantity: i64,
        reason: &str,
        moved_at: NaiveDate,
        recorded_by: Uuid,
    ) -> Result<(Item, StockMovement), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        validate_quantity(quantity)?;
        if reason.trim().is_empty() {
            return Err(validation_error(
                "reason",
                "required",
                "O motivo do descarte é obrigatório.",
            ));
        }

        let mut tx = executor.begin().await?;

        let item = self
            .item_repo
            .find_by_id(&mut *tx, item_id)
            .await?
            .ok_or(AppError::ItemNotFound)?;

        ensure_sufficient(item.current_quantity, quantity)?;

        let updated = self
            .item_repo
            .debit_quantity(&mut *tx, item_id, quantity)
            .await?
            .ok_or(AppError::InsufficientStock {
                available: item.current_quantity,
                requested: quantity,
            })?;

        let movement = self
            .movement_repo
            .insert(
                &mut *tx,
                &NewMovement {
                    item_id,
                    movement_type: MovementType::Disposal,
                    quantity,
                    unit_price: None,
                    condition: None,
                    purpose: None,
                    project: None,
                    reason: Some(reason.to_string()),
                    ordered_by: None,
                    received_by: None,
                    is_rental: false,
                    return_date: None,
                    moved_at,
                    recorded_by,
                },
            )
            .await?;

        tx.commit().await?;
        Ok((updated, movement))
    }

    // --- CORREÇÃO (privilegiada) ---
    // Movimentação é imutável fora daqui. A correção reescreve a linha e
    // reaplica a diferença no saldo, tudo na mesma transação.
    pub async fn correct_movement<'e, E>(
        &self,
        executor: E,
        movement_id: Uuid,
        quantity: i64,
        purpose: Option<&str>,
        project: Option<&str>,
        reason: Option<&str>,
    ) -> Result<StockMovement, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        validate_quantity(quantity)?;

        let mut tx = executor.begin().await?;

        let movement = self
            .movement_repo
            .find_by_id(&mut *tx, movement_id)
            .await?
            .ok_or(AppError::MovementNotFound)?;

        // Entrada maior aumenta o saldo; saída/descarte maior diminui.
        let delta = match movement.movement_type {
            MovementType::StockIn => quantity - movement.quantity,
            MovementType::StockOut | MovementType::Disposal => movement.quantity - quantity,
        };

        if delta != 0 {
            let item = self
                .item_repo
                .find_by_id(&mut *tx, movement.item_id)
                .await?
                .ok_or(AppError::ItemNotFound)?;

            self.item_repo
                .shift_quantity(&mut *tx, movement.item_id, delta)
                .await?
                .ok_or(AppError::InsufficientStock {
                    available: item.current_quantity,
                    requested: delta.abs(),
                })?;
        }

        let corrected = self
            .movement_repo
            .update_correction(&mut *tx, movement_id, quantity, purpose, project, reason)
            .await?
            .ok_or(AppError::MovementNotFound)?;

        tx.commit().await?;
        Ok(corrected)
    }

    // --- CADASTRO ---
    pub async fn update_item<'e, E>(
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
    ) -> Result<StockStatus, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        validate_unit_price(unit_price)?;
        if name.trim().is_empty() {
            return Err(validation_error(
                "name",
                "required",
                "O nome do item é obrigatório.",
            ));
        }
        if min_stock < 0 || max_stock < 0 {
            return Err(validation_error(
                "minStock",
                "range",
                "Os limites de estoque não podem ser negativos.",
            ));
        }

        let item = self
            .item_repo
            .update_details(
                executor,
                item_id,
                name,
                specification,
                maker,
                category,
                unit,
                unit_price,
                min_stock,
                max_stock,
            )
            .await?
            .ok_or(AppError::ItemNotFound)?;
        Ok(StockStatus::from(item))
    }

    pub async fn bulk_delete<'e, E>(
        &self,
        executor: E,
        item_ids: &[Uuid],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if item_ids.is_empty() {
            return Err(validation_error(
                "itemIds",
                "required",
                "Informe ao menos um item para remover.",
            ));
        }
        self.item_repo.soft_delete_many(executor, item_ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_must_be_positive() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-5).is_err());
    }

    #[test]
    fn unit_price_cap_is_a_hard_boundary() {
        assert!(validate_unit_price(Decimal::ZERO).is_ok());
        assert!(validate_unit_price(max_unit_price()).is_ok());

        let above = max_unit_price() + Decimal::new(1, 2); // +0,01
        assert!(validate_unit_price(above).is_err());
        assert!(validate_unit_price(Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn taking_exactly_the_available_quantity_is_allowed() {
        assert!(ensure_sufficient(50, 50).is_ok());
    }

    #[test]
    fn taking_one_more_than_available_is_rejected() {
        let err = ensure_sufficient(50, 51).unwrap_err();
        match err {
            AppError::InsufficientStock {
                available,
                requested,
            } => {
                assert_eq!(available, 50);
                assert_eq!(requested, 51);
            }
            other => panic!("esperava InsufficientStock, veio {other:?}"),
        }
    }

    #[test]
    fn reconciled_quantity_follows_the_ledger() {
        let sums = MovementSums {
            stock_in: 120,
            stock_out: 30,
            disposal: 10,
        };
        assert_eq!(reconciled_quantity(500, &sums), 580);
    }

    // Cenário de ponta a ponta do fluxo de saída: base 500, sai 50.
    #[test]
    fn stock_out_scenario_recomputes_quantity_and_amount() {
        let sums = MovementSums {
            stock_in: 0,
            stock_out: 50,
            disposal: 0,
        };
        let current = reconciled_quantity(500, &sums);
        assert_eq!(current, 450);

        let unit_price = Decimal::new(250_000, 2); // 2500,00
        let total = Decimal::from(current) * unit_price;
        assert_eq!(total, Decimal::new(112_500_000, 2)); // 1.125.000,00

        // total_amount nunca diverge do produto além do arredondamento.
        let tolerance = Decimal::new(1, 2);
        assert!((total - Decimal::from(450) * unit_price).abs() <= tolerance);
    }

    #[test]
    fn rental_without_return_date_is_invalid() {
        assert!(validate_rental(false, None).is_ok());
        assert!(validate_rental(true, NaiveDate::from_ymd_opt(2025, 8, 30)).is_ok());

        let err = validate_rental(true, None).unwrap_err();
        match err {
            AppError::ValidationError(errors) => {
                assert!(errors.field_errors().contains_key("returnDate"));
            }
            other => panic!("esperava ValidationError, veio {other:?}"),
        }
    }
}
