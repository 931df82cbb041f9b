// src/handlers/csv.rs

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::{error::ApiError, response::ok},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{CanStockIn, RequireCapability},
    },
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub imported: usize,
}

// POST /api/stock/csv-import
// O corpo é o CSV cru (text/csv). Valida tudo, aplica tudo ou nada.
#[utoipa::path(
    post,
    path = "/api/stock/csv-import",
    tag = "CSV",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Planilha aplicada por inteiro", body = ImportResult),
        (status = 400, description = "Alguma linha inválida; nada foi importado")
    ),
    security(("api_jwt" = []))
)]
pub async fn import_stock_csv(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequireCapability<CanStockIn>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let today = Utc::now().date_naive();

    let imported = app_state
        .csv_service
        .import_stock_in(&app_state.db_pool, &body, today, user.0.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(ImportResult { imported })))
}

// GET /api/stock/csv-export
// Download direto: aqui não tem envelope, o corpo É o arquivo.
#[utoipa::path(
    get,
    path = "/api/stock/csv-export",
    tag = "CSV",
    responses(
        (status = 200, description = "Situação do estoque em CSV", content_type = "text/csv")
    ),
    security(("api_jwt" = []))
)]
pub async fn export_stock_csv(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let content = app_state
        .csv_service
        .export_stock(&app_state.db_pool)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"estoque.csv\"",
            ),
        ],
        content,
    ))
}
