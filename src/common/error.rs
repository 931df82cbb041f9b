// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro de domínio, com `thiserror` para melhor ergonomia.
// A mensagem do `#[error]` é o que vai para o log; o que vai para o cliente
// sai do I18nStore, no idioma pedido.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regra de negócio do estoque: nunca deixar o saldo ficar negativo.
    #[error("Estoque insuficiente (disponível {available}, solicitado {requested})")]
    InsufficientStock { available: i64, requested: i64 },

    // Portões do fluxo de fechamento.
    #[error("Fechamento não permitido: {0}")]
    ClosingNotAllowed(String),

    #[error("Ano {year} com {closed} trimestre(s) fechado(s), precisa de 4")]
    IncompleteQuarter { year: i32, closed: i64 },

    #[error("Item não encontrado")]
    ItemNotFound,

    #[error("Movimentação não encontrada")]
    MovementNotFound,

    #[error("Registro do diário não encontrado")]
    EntryNotFound,

    // Importação de planilha: a linha inteira é rejeitada em bloco,
    // nada é gravado.
    #[error("Linha {line} da planilha: {message}")]
    CsvImport { line: usize, message: String },

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Sem permissão: requer '{0}'")]
    Forbidden(&'static str),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // Arquivo CSV que nem chega a ser lido linha a linha.
    #[error("Erro de CSV: {0}")]
    CsvError(#[from] csv::Error),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::CsvImport { .. }
            | AppError::CsvError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ItemNotFound
            | AppError::MovementNotFound
            | AppError::EntryNotFound
            | AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::InsufficientStock { .. }
            | AppError::ClosingNotAllowed(_)
            | AppError::IncompleteQuarter { .. }
            | AppError::EmailAlreadyExists
            | AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn i18n_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "error.validation",
            AppError::InsufficientStock { .. } => "error.insufficient_stock",
            AppError::ClosingNotAllowed(_) => "error.closing_not_allowed",
            AppError::IncompleteQuarter { .. } => "error.incomplete_quarter",
            AppError::ItemNotFound => "error.item_not_found",
            AppError::MovementNotFound => "error.movement_not_found",
            AppError::EntryNotFound => "error.entry_not_found",
            AppError::CsvImport { .. } | AppError::CsvError(_) => "error.csv_import",
            AppError::EmailAlreadyExists => "error.email_in_use",
            AppError::InvalidCredentials => "error.invalid_credentials",
            AppError::InvalidToken => "error.invalid_token",
            AppError::UserNotFound => "error.user_not_found",
            AppError::Forbidden(_) => "error.forbidden",
            AppError::UniqueConstraintViolation(_) => "error.conflict",
            _ => "error.internal",
        }
    }

    // Os dados dinâmicos não entram na mensagem traduzida; vão em `details`.
    fn details(&self) -> Option<Value> {
        match self {
            AppError::ValidationError(errors) => {
                let mut fields = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    fields.insert(field.to_string(), json!(messages));
                }
                Some(Value::Object(fields))
            }
            AppError::InsufficientStock { available, requested } => Some(json!({
                "available": available,
                "requested": requested,
            })),
            AppError::ClosingNotAllowed(reason) => Some(json!({ "reason": reason })),
            AppError::IncompleteQuarter { year, closed } => Some(json!({
                "year": year,
                "closedQuarters": closed,
            })),
            AppError::CsvImport { line, message } => Some(json!({
                "line": line,
                "message": message,
            })),
            AppError::Forbidden(capability) => Some(json!({ "required": capability })),
            AppError::UniqueConstraintViolation(constraint) => {
                Some(json!({ "constraint": constraint }))
            }
            _ => None,
        }
    }

    /// Converte para a resposta HTTP no idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();

        // Erros 5xx logam a mensagem detalhada; o cliente só vê o genérico.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro interno do servidor: {}", self);
        }

        ApiError {
            status,
            error: store.message(&locale.0, self.i18n_key()).to_string(),
            details: self.details(),
        }
    }
}

/// Monta um erro de validação de um campo só, fora do derive do `validator`
/// (checagens numéricas feitas nos services e na importação de planilha).
pub fn validation_error(
    field: &'static str,
    code: &'static str,
    message: &'static str,
) -> AppError {
    let mut error = validator::ValidationError::new(code);
    error.message = Some(message.into());
    let mut errors = validator::ValidationErrors::new();
    errors.add(field.into(), error);
    AppError::ValidationError(errors)
}

// ---
// ApiError: o envelope de erro que sai pela rede.
// ---
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "ok": false,
            "error": self.error,
            "details": self.details,
        }));
        (self.status, body).into_response()
    }
}

// Os middlewares e extratores rejeitam com AppError direto (sem Locale à mão):
// cai na mensagem padrão em inglês.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let store = I18nStore::new();
        self.to_api_error(&Locale("en".to_string()), &store)
            .into_response()
    }
}
