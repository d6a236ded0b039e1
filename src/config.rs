// src/config.rs

use std::{env, sync::Arc, time::Duration};

use rand::{rngs::StdRng, SeedableRng};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{BusinessRepository, ItemRepository, MilestoneRepository, UserRepository},
    services::{
        auth::AuthService, business_service::BusinessService, item_service::ItemService,
        milestone_service::MilestoneService, statistics_service::StatisticsService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub business_service: BusinessService,
    pub item_service: ItemService,
    pub milestone_service: MilestoneService,
    pub statistics_service: StatisticsService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let business_repo = BusinessRepository::new();
        let item_repo = ItemRepository::new(db_pool.clone());
        let milestone_repo = MilestoneRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            jwt_secret.clone(),
            db_pool.clone(),
            StdRng::from_entropy(),
        );
        let business_service = BusinessService::new(
            business_repo,
            user_repo,
            auth_service.clone(),
            db_pool.clone(),
        );
        let milestone_service = MilestoneService::new(milestone_repo, item_repo.clone());
        let item_service = ItemService::new(
            item_repo.clone(),
            milestone_service.clone(),
            db_pool.clone(),
        );
        let statistics_service = StatisticsService::new(Arc::new(item_repo));

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            business_service,
            item_service,
            milestone_service,
            statistics_service,
        })
    }
}
