// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    common::{error::ApiError, response::ok},
    config::AppState,
    middleware::i18n::Locale,
    models::dashboard::{DashboardSummary, LowStockItem, RecentMovement},
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Resumo do almoxarifado", body = DashboardSummary),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .dashboard_service
        .get_summary(&app_state.db_pool)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(summary)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

// GET /api/dashboard/recent-movements
#[utoipa::path(
    get,
    path = "/api/dashboard/recent-movements",
    tag = "Dashboard",
    params(("limit" = Option<i64>, Query, description = "Quantas linhas (padrão 10)")),
    responses(
        (status = 200, description = "Últimas movimentações", body = Vec<RecentMovement>)
    ),
    security(("api_jwt" = []))
)]
pub async fn recent_movements(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<RecentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let movements = app_state
        .dashboard_service
        .recent_movements(&app_state.db_pool, limit)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(movements)))
}

// GET /api/dashboard/low-stock
#[utoipa::path(
    get,
    path = "/api/dashboard/low-stock",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Itens no estoque mínimo ou abaixo", body = Vec<LowStockItem>)
    ),
    security(("api_jwt" = []))
)]
pub async fn low_stock(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .dashboard_service
        .low_stock_items(&app_state.db_pool)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(items)))
}
