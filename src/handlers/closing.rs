// src/handlers/closing.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    common::{error::ApiError, response::ok},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{CanClosing, RequireCapability},
    },
    models::closing::{Closing, ClosingHistory},
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloseQuarterPayload {
    #[schema(example = 2)]
    pub quarter: i16,
    #[schema(example = 2025)]
    pub year: i32,
}

// POST /api/stock/closing-process
#[utoipa::path(
    post,
    path = "/api/stock/closing-process",
    tag = "Closing",
    request_body = CloseQuarterPayload,
    responses(
        (status = 200, description = "Trimestre fechado, base rebatizada", body = Closing),
        (status = 403, description = "Nível insuficiente"),
        (status = 409, description = "Fora da janela de fechamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn close_quarter(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireCapability<CanClosing>,
    Json(payload): Json<CloseQuarterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    // O portão de calendário usa o relógio do servidor, não o do cliente.
    let today = Utc::now().date_naive();

    let closing = app_state
        .closing_service
        .close_quarter(
            &app_state.db_pool,
            payload.quarter,
            payload.year,
            today,
            user.0.id,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(closing)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloseYearPayload {
    #[schema(example = 2024)]
    pub year: i32,
}

// POST /api/stock/closing-process/year
#[utoipa::path(
    post,
    path = "/api/stock/closing-process/year",
    tag = "Closing",
    request_body = CloseYearPayload,
    responses(
        (status = 200, description = "Ano marcado como fechado"),
        (status = 409, description = "Faltam trimestres fechados")
    ),
    security(("api_jwt" = []))
)]
pub async fn close_year(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireCapability<CanClosing>,
    Json(payload): Json<CloseYearPayload>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .closing_service
        .close_year(&app_state.db_pool, payload.year, user.0.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(serde_json::json!({ "year": payload.year }))))
}

// GET /api/stock/closing-history
#[utoipa::path(
    get,
    path = "/api/stock/closing-history",
    tag = "Closing",
    responses(
        (status = 200, description = "Fechamentos trimestrais e anuais", body = ClosingHistory)
    ),
    security(("api_jwt" = []))
)]
pub async fn closing_history(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let history = app_state
        .closing_service
        .history(&app_state.db_pool)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(history)))
}
