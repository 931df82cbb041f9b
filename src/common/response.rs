// src/common/response.rs

use axum::Json;
use serde::Serialize;

// O envelope de sucesso que o frontend espera: { ok: true, data: ... }.
// O irmão de erro ({ ok: false, error, details }) mora no ApiError.
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<ApiSuccess<T>> {
    Json(ApiSuccess { ok: true, data })
}
