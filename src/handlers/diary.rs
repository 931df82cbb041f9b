// src/handlers/diary.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        response::ok,
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::diary::{ProjectGroup, WorkDiaryEntry},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryPayload {
    pub entry_date: NaiveDate,
    #[schema(example = "Obra Bloco B")]
    pub project: Option<String>,
    #[validate(length(min = 1, message = "O texto do registro é obrigatório."))]
    pub content: String,
}

// POST /api/diary
#[utoipa::path(
    post,
    path = "/api/diary",
    tag = "Diary",
    request_body = CreateEntryPayload,
    responses(
        (status = 201, description = "Registro criado", body = WorkDiaryEntry)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_entry(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CreateEntryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let entry = app_state
        .diary_service
        .create_entry(
            &app_state.db_pool,
            payload.entry_date,
            &user.0,
            payload.project.as_deref(),
            &payload.content,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, ok(entry)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiaryListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub project: Option<String>,
}

// GET /api/diary?from=...&to=...&project=...
#[utoipa::path(
    get,
    path = "/api/diary",
    tag = "Diary",
    params(
        ("from" = Option<NaiveDate>, Query, description = "Data inicial"),
        ("to" = Option<NaiveDate>, Query, description = "Data final"),
        ("project" = Option<String>, Query, description = "Filtra por projeto")
    ),
    responses(
        (status = 200, description = "Registros filtrados", body = Vec<WorkDiaryEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_entries(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<DiaryListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = app_state
        .diary_service
        .list_entries(
            &app_state.db_pool,
            query.from,
            query.to,
            query.project.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(entries)))
}

// GET /api/diary/projects
#[utoipa::path(
    get,
    path = "/api/diary/projects",
    tag = "Diary",
    responses(
        (status = 200, description = "Registros agrupados por projeto", body = Vec<ProjectGroup>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_projects(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let groups = app_state
        .diary_service
        .project_groups(&app_state.db_pool)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(groups)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryPayload {
    pub entry_date: NaiveDate,
    pub project: Option<String>,
    #[validate(length(min = 1, message = "O texto do registro é obrigatório."))]
    pub content: String,
}

// PUT /api/diary/{id}
#[utoipa::path(
    put,
    path = "/api/diary/{id}",
    tag = "Diary",
    request_body = UpdateEntryPayload,
    params(("id" = Uuid, Path, description = "ID do registro")),
    responses(
        (status = 200, description = "Registro atualizado", body = WorkDiaryEntry),
        (status = 403, description = "Só o autor ou um administrador"),
        (status = 404, description = "Registro não existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_entry(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(entry_id): Path<Uuid>,
    Json(payload): Json<UpdateEntryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let entry = app_state
        .diary_service
        .update_entry(
            &app_state.db_pool,
            entry_id,
            &user.0,
            payload.entry_date,
            payload.project.as_deref(),
            &payload.content,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(entry)))
}

// DELETE /api/diary/{id}
#[utoipa::path(
    delete,
    path = "/api/diary/{id}",
    tag = "Diary",
    params(("id" = Uuid, Path, description = "ID do registro")),
    responses(
        (status = 200, description = "Registro removido"),
        (status = 403, description = "Só o autor ou um administrador"),
        (status = 404, description = "Registro não existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_entry(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(entry_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .diary_service
        .delete_entry(&app_state.db_pool, entry_id, &user.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, ok(serde_json::json!({ "deleted": true }))))
}
