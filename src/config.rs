// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    common::i18n::I18nStore,
    db::{
        ClosingRepository, DashboardRepository, DiaryRepository, ItemRepository,
        MovementRepository, UserRepository,
    },
    services::{
        auth::AuthService, closing_service::ClosingService, csv_service::CsvService,
        dashboard_service::DashboardService, diary_service::DiaryService,
        stock_service::StockService,
    },
};

// O estado compartilhado, montado uma vez na subida do processo e injetado
// em tudo. Não existe cliente de banco global em módulo nenhum.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: I18nStore,
    pub auth_service: AuthService,
    pub stock_service: StockService,
    pub closing_service: ClosingService,
    pub csv_service: CsvService,
    pub diary_service: DiaryService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let item_repo = ItemRepository::new(db_pool.clone());
        let movement_repo = MovementRepository::new(db_pool.clone());
        let closing_repo = ClosingRepository::new(db_pool.clone());
        let diary_repo = DiaryRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret, db_pool.clone());
        let stock_service = StockService::new(
            item_repo.clone(),
            movement_repo,
            closing_repo.clone(),
        );
        let closing_service = ClosingService::new(closing_repo, item_repo.clone());
        let csv_service = CsvService::new(stock_service.clone(), item_repo);
        let diary_service = DiaryService::new(diary_repo);
        let dashboard_service = DashboardService::new(dashboard_repo);

        Ok(Self {
            db_pool,
            i18n_store: I18nStore::new(),
            auth_service,
            stock_service,
            closing_service,
            csv_service,
            diary_service,
            dashboard_service,
        })
    }
}
