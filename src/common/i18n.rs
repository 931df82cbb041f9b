// src/common/i18n.rs

use std::collections::HashMap;

// Tabela de mensagens por idioma. Montada uma vez no AppState e compartilhada
// por todos os handlers; "en" é o idioma de fallback.
#[derive(Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

const MESSAGES: &[(&str, &str, &str)] = &[
    // --- en ---
    ("en", "error.validation", "One or more fields are invalid."),
    ("en", "error.insufficient_stock", "Not enough stock for this operation."),
    ("en", "error.closing_not_allowed", "Closing is not allowed right now."),
    ("en", "error.incomplete_quarter", "All four quarters must be closed first."),
    ("en", "error.item_not_found", "Item not found."),
    ("en", "error.movement_not_found", "Stock movement not found."),
    ("en", "error.entry_not_found", "Diary entry not found."),
    ("en", "error.csv_import", "The spreadsheet was rejected; nothing was imported."),
    ("en", "error.email_in_use", "This e-mail is already in use."),
    ("en", "error.invalid_credentials", "Invalid e-mail or password."),
    ("en", "error.invalid_token", "Missing or invalid authentication token."),
    ("en", "error.user_not_found", "User not found."),
    ("en", "error.forbidden", "Your access level does not allow this action."),
    ("en", "error.conflict", "The record conflicts with an existing one."),
    ("en", "error.internal", "An unexpected error occurred."),
    // --- pt ---
    ("pt", "error.validation", "Um ou mais campos são inválidos."),
    ("pt", "error.insufficient_stock", "Estoque insuficiente para esta operação."),
    ("pt", "error.closing_not_allowed", "O fechamento não é permitido agora."),
    ("pt", "error.incomplete_quarter", "Os quatro trimestres precisam estar fechados antes."),
    ("pt", "error.item_not_found", "Item não encontrado."),
    ("pt", "error.movement_not_found", "Movimentação não encontrada."),
    ("pt", "error.entry_not_found", "Registro do diário não encontrado."),
    ("pt", "error.csv_import", "A planilha foi rejeitada; nada foi importado."),
    ("pt", "error.email_in_use", "Este e-mail já está em uso."),
    ("pt", "error.invalid_credentials", "E-mail ou senha inválidos."),
    ("pt", "error.invalid_token", "Token de autenticação inválido ou ausente."),
    ("pt", "error.user_not_found", "Usuário não encontrado."),
    ("pt", "error.forbidden", "Seu nível de acesso não permite esta ação."),
    ("pt", "error.conflict", "O registro conflita com um já existente."),
    ("pt", "error.internal", "Ocorreu um erro inesperado."),
];

impl I18nStore {
    pub fn new() -> Self {
        let mut messages: HashMap<&'static str, HashMap<&'static str, &'static str>> =
            HashMap::new();
        for &(lang, key, text) in MESSAGES {
            messages.entry(lang).or_default().insert(key, text);
        }
        Self { messages }
    }

    /// Busca a mensagem no idioma pedido; idioma desconhecido cai no "en".
    pub fn message(&self, lang: &str, key: &str) -> &'static str {
        self.messages
            .get(lang)
            .and_then(|table| table.get(key))
            .or_else(|| self.messages.get("en").and_then(|table| table.get(key)))
            .copied()
            .unwrap_or("An unexpected error occurred.")
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_english() {
        let store = I18nStore::new();
        assert_eq!(
            store.message("ko", "error.item_not_found"),
            store.message("en", "error.item_not_found"),
        );
    }

    #[test]
    fn portuguese_messages_are_served() {
        let store = I18nStore::new();
        assert_eq!(
            store.message("pt", "error.insufficient_stock"),
            "Estoque insuficiente para esta operação."
        );
    }

    #[test]
    fn unknown_key_still_answers_something() {
        let store = I18nStore::new();
        assert!(!store.message("en", "error.does_not_exist").is_empty());
    }
}
