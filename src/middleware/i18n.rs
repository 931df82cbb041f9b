// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

// Nosso extrator de idioma
pub struct Locale(pub String);

/// Reduz o Accept-Language ao código primário do primeiro idioma.
/// "pt-BR, en;q=0.8" -> "pt"
fn primary_language(header_value: &str) -> Option<String> {
    accept_language::parse(header_value)
        .first()
        .map(|tag| tag.split('-').next().unwrap_or(tag).to_string())
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let lang = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(primary_language)
            .unwrap_or_else(|| "en".to_string());

        Ok(Locale(lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_the_first_language_and_strips_the_region() {
        assert_eq!(primary_language("pt-BR, en;q=0.8"), Some("pt".to_string()));
        assert_eq!(primary_language("en"), Some("en".to_string()));
    }

    #[test]
    fn garbage_header_yields_none() {
        assert_eq!(primary_language(""), None);
    }
}
