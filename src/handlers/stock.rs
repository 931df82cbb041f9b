// src/handlers/stock.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{validation_error, ApiError, AppError},
        response::ok,
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{
            ensure_capability, CanCorrectMovements, CanDelete, CanDisposal, CanStockIn,
            CanStockOut, CapabilityDef, RequireCapability,
        },
    },
    models::inventory::{ConditionType, StockMovement, StockStatus},
    services::stock_service::StockInDraft,
};

// =============================================================================
//  1. TRANSAÇÃO DE ESTOQUE (entrada / saída / descarte)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    In,
    Out,
    Disposal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockTransactionPayload {
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    // Saída e descarte exigem o item; entrada aceita item novo pelos campos
    // de cadastro abaixo.
    pub item_id: Option<Uuid>,

    pub name: Option<String>,
    #[serde(default)]
    pub specification: String,
    #[serde(default)]
    pub maker: String,
    pub category: Option<String>,
    pub unit: Option<String>,

    #[schema(example = 50)]
    pub quantity: i64,
    pub unit_price: Option<Decimal>,
    pub condition: Option<ConditionType>,

    pub purpose: Option<String>,
    pub project: Option<String>,
    pub reason: Option<String>,
    pub ordered_by: Option<String>,
    pub received_by: Option<String>,

    #[serde(default)]
    pub is_rental: bool,
    pub return_date: Option<NaiveDate>,

    // Data da movimentação. Obrigatória — sem data não entra nada no livro.
    pub moved_at: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    pub item: StockStatus,
    pub movement: StockMovement,
}

// POST /api/stock/transaction
#[utoipa::path(
    post,
    path = "/api/stock/transaction",
    tag = "Stock",
    request_body = StockTransactionPayload,
    responses(
        (status = 201, description = "Movimentação registrada", body = TransactionResult),
        (status = 403, description = "Nível insuficiente para o tipo pedido"),
        (status = 409, description = "Estoque insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<StockTransactionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    // A capacidade exigida depende do tipo; por isso a checagem é explícita
    // aqui em vez de um guardião na assinatura.
    let result = match payload.kind {
        TransactionKind::In => {
            ensure_capability(user.0.role, CanStockIn::minimum(), CanStockIn::slug())
                .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

            let draft = StockInDraft {
                item_id: payload.item_id,
                name: payload.name.clone(),
                specification: payload.specification.clone(),
                maker: payload.maker.clone(),
                category: payload.category.clone(),
                unit: payload.unit.clone(),
                quantity: payload.quantity,
                unit_price: payload.unit_price.unwrap_or(Decimal::ZERO),
                condition: payload.condition.unwrap_or(ConditionType::Unknown),
                purpose: payload.purpose.clone(),
                reason: payload.reason.clone(),
                ordered_by: payload.ordered_by.clone(),
                received_by: payload.received_by.clone(),
                moved_at: payload.moved_at,
            };

            app_state
                .stock_service
                .record_stock_in(&app_state.db_pool, &draft, user.0.id)
                .await
        }
        TransactionKind::Out => {
            ensure_capability(user.0.role, CanStockOut::minimum(), CanStockOut::slug())
                .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

            let item_id = payload.item_id.ok_or_else(|| {
                validation_error("itemId", "required", "Informe o item da saída.")
                    .to_api_error(&locale, &app_state.i18n_store)
            })?;

            app_state
                .stock_service
                .record_stock_out(
                    &app_state.db_pool,
                    item_id,
                    payload.quantity,
                    payload.is_rental,
                    payload.return_date,
                    payload.project.as_deref(),
                    payload.purpose.as_deref(),
                    payload.moved_at,
                    user.0.id,
                )
                .await
        }
        TransactionKind::Disposal => {
            ensure_capability(user.0.role, CanDisposal::minimum(), CanDisposal::slug())
                .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

            let item_id = payload.item_id.ok_or_else(|| {
                validation_error("itemId", "required", "Informe o item do descarte.")
                    .to_api_error(&locale, &app_state.i18n_store)
            })?;

            app_state
                .stock_service
                .record_disposal(
                    &app_state.db_pool,
                    item_id,
                    payload.quantity,
                    payload.reason.as_deref().unwrap_or_default(),
                    payload.moved_at,
                    user.0.id,
                )
                .await
        }
    };

    let (item, movement) =
        result.map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::CREATED,
        ok(TransactionResult {
            item: StockStatus::from(item),
            movement,
        }),
    ))
}

// =============================================================================
//  2. CATÁLOGO / SITUAÇÃO DO ESTOQUE
// =============================================================================

// GET /api/stock/items
#[utoipa::path(
    get,
    path = "/api/stock/items",
    tag = "Stock",
    responses(
        (status = 200, description = "Situação de todos os itens vivos", body = Vec<StockStatus>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stock_items(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let statuses = app_state
        .stock_service
        .list_stock_status(&app_state.db_pool)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(statuses)))
}

// GET /api/stock/items/{id}
#[utoipa::path(
    get,
    path = "/api/stock/items/{id}",
    tag = "Stock",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Situação de um item", body = StockStatus),
        (status = 404, description = "Item não existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stock_item(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let status = app_state
        .stock_service
        .get_stock_status(&app_state.db_pool, item_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(status)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[serde(default)]
    pub specification: String,
    #[serde(default)]
    pub maker: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub unit_price: Decimal,
    #[validate(range(min = 0, message = "O estoque mínimo não pode ser negativo."))]
    pub min_stock: i64,
    #[validate(range(min = 0, message = "O estoque máximo não pode ser negativo."))]
    pub max_stock: i64,
}

// PUT /api/stock/items/{id}
#[utoipa::path(
    put,
    path = "/api/stock/items/{id}",
    tag = "Stock",
    request_body = UpdateItemPayload,
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Cadastro atualizado", body = StockStatus),
        (status = 404, description = "Item não existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<UpdateItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let status = app_state
        .stock_service
        .update_item(
            &app_state.db_pool,
            item_id,
            &payload.name,
            &payload.specification,
            &payload.maker,
            payload.category.as_deref(),
            payload.unit.as_deref(),
            payload.unit_price,
            payload.min_stock,
            payload.max_stock,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(status)))
}

// GET /api/stock/items/{id}/movements
#[utoipa::path(
    get,
    path = "/api/stock/items/{id}/movements",
    tag = "Stock",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Livro-razão do item", body = Vec<StockMovement>),
        (status = 404, description = "Item não existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_item_movements(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let movements = app_state
        .stock_service
        .list_movements(&app_state.db_pool, item_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(movements)))
}

// GET /api/stock/items/{id}/reconciliation
#[utoipa::path(
    get,
    path = "/api/stock/items/{id}/reconciliation",
    tag = "Stock",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Saldo gravado × saldo recalculado",
         body = crate::models::inventory::ReconciliationReport),
        (status = 404, description = "Item não existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_item_reconciliation(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .stock_service
        .reconcile_item(&app_state.db_pool, item_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(report)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeletePayload {
    pub item_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResult {
    pub removed: u64,
}

// POST /api/stock/items/bulk-delete
#[utoipa::path(
    post,
    path = "/api/stock/items/bulk-delete",
    tag = "Stock",
    request_body = BulkDeletePayload,
    responses(
        (status = 200, description = "Itens marcados como removidos", body = BulkDeleteResult),
        (status = 403, description = "Só administrador remove itens")
    ),
    security(("api_jwt" = []))
)]
pub async fn bulk_delete_items(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireCapability<CanDelete>,
    Json(payload): Json<BulkDeletePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = app_state
        .stock_service
        .bulk_delete(&app_state.db_pool, &payload.item_ids)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(BulkDeleteResult { removed })))
}

// =============================================================================
//  3. CORREÇÃO DE MOVIMENTAÇÃO (privilegiada)
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CorrectMovementPayload {
    #[schema(example = 45)]
    pub quantity: i64,
    pub purpose: Option<String>,
    pub project: Option<String>,
    pub reason: Option<String>,
}

// PUT /api/stock/movements/{id}
#[utoipa::path(
    put,
    path = "/api/stock/movements/{id}",
    tag = "Stock",
    request_body = CorrectMovementPayload,
    params(("id" = Uuid, Path, description = "ID da movimentação")),
    responses(
        (status = 200, description = "Movimentação corrigida e saldo reajustado", body = StockMovement),
        (status = 404, description = "Movimentação não existe"),
        (status = 409, description = "A correção deixaria o saldo negativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn correct_movement(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireCapability<CanCorrectMovements>,
    Path(movement_id): Path<Uuid>,
    Json(payload): Json<CorrectMovementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let movement = app_state
        .stock_service
        .correct_movement(
            &app_state.db_pool,
            movement_id,
            payload.quantity,
            payload.purpose.as_deref(),
            payload.project.as_deref(),
            payload.reason.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(movement)))
}
