// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Define as rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/", get(handlers::auth::list_users))
        .route("/{id}/role", put(handlers::auth::change_role))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let stock_routes = Router::new()
        .route("/items", get(handlers::stock::get_stock_items))
        .route(
            "/items/{id}",
            get(handlers::stock::get_stock_item).put(handlers::stock::update_item),
        )
        .route(
            "/items/{id}/movements",
            get(handlers::stock::get_item_movements),
        )
        .route(
            "/items/{id}/reconciliation",
            get(handlers::stock::get_item_reconciliation),
        )
        .route(
            "/items/bulk-delete",
            post(handlers::stock::bulk_delete_items),
        )
        .route("/transaction", post(handlers::stock::create_transaction))
        .route("/movements/{id}", put(handlers::stock::correct_movement))
        .route("/closing-process", post(handlers::closing::close_quarter))
        .route(
            "/closing-process/year",
            post(handlers::closing::close_year),
        )
        .route("/closing-history", get(handlers::closing::closing_history))
        .route("/csv-import", post(handlers::csv::import_stock_csv))
        .route("/csv-export", get(handlers::csv::export_stock_csv))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let diary_routes = Router::new()
        .route(
            "/",
            post(handlers::diary::create_entry).get(handlers::diary::list_entries),
        )
        .route("/projects", get(handlers::diary::list_projects))
        .route(
            "/{id}",
            put(handlers::diary::update_entry).delete(handlers::diary::delete_entry),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary))
        .route(
            "/recent-movements",
            get(handlers::dashboard::recent_movements),
        )
        .route("/low-stock", get(handlers::dashboard::low_stock))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/stock", stock_routes)
        .nest("/api/diary", diary_routes)
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
