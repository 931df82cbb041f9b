// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::list_users,
        handlers::auth::change_role,

        // --- Stock ---
        handlers::stock::create_transaction,
        handlers::stock::get_stock_items,
        handlers::stock::get_stock_item,
        handlers::stock::update_item,
        handlers::stock::get_item_movements,
        handlers::stock::get_item_reconciliation,
        handlers::stock::bulk_delete_items,
        handlers::stock::correct_movement,

        // --- Closing ---
        handlers::closing::close_quarter,
        handlers::closing::close_year,
        handlers::closing::closing_history,

        // --- CSV ---
        handlers::csv::import_stock_csv,
        handlers::csv::export_stock_csv,

        // --- Diary ---
        handlers::diary::create_entry,
        handlers::diary::list_entries,
        handlers::diary::list_projects,
        handlers::diary::update_entry,
        handlers::diary::delete_entry,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::recent_movements,
        handlers::dashboard::low_stock,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::ChangeRolePayload,

            // --- Inventory ---
            models::inventory::Item,
            models::inventory::MovementType,
            models::inventory::ConditionType,
            models::inventory::StockMovement,
            models::inventory::StockStatus,
            models::inventory::ReconciliationReport,

            // --- Closing ---
            models::closing::Closing,
            models::closing::ClosingSnapshot,
            models::closing::AnnualClosing,
            models::closing::ClosingHistory,

            // --- Diary ---
            models::diary::WorkDiaryEntry,
            models::diary::ProjectGroup,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::RecentMovement,
            models::dashboard::LowStockItem,

            // --- Payloads ---
            handlers::stock::TransactionKind,
            handlers::stock::StockTransactionPayload,
            handlers::stock::TransactionResult,
            handlers::stock::UpdateItemPayload,
            handlers::stock::BulkDeletePayload,
            handlers::stock::BulkDeleteResult,
            handlers::stock::CorrectMovementPayload,
            handlers::closing::CloseQuarterPayload,
            handlers::closing::CloseYearPayload,
            handlers::csv::ImportResult,
            handlers::diary::CreateEntryPayload,
            handlers::diary::UpdateEntryPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Perfil e Níveis de Acesso"),
        (name = "Stock", description = "Almoxarifado: itens e movimentações"),
        (name = "Closing", description = "Fechamento Trimestral e Anual"),
        (name = "CSV", description = "Importação e Exportação de Planilhas"),
        (name = "Diary", description = "Diário de Obra"),
        (name = "Dashboard", description = "Indicadores do Almoxarifado")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
