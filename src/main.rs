//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let business_routes = Router::new()
        .route("/", post(handlers::businesses::create_business))
        .route(
            "/{business_id}/items",
            get(handlers::items::list_items).post(handlers::items::create_item),
        )
        .route(
            "/{business_id}/items/{item_sku}",
            get(handlers::items::get_item).delete(handlers::items::delete_item),
        )
        .route(
            "/{business_id}/categories",
            get(handlers::items::list_categories),
        )
        .route(
            "/{business_id}/items/{item_sku}/stock",
            post(handlers::items::record_stock_update),
        )
        .route(
            "/{business_id}/items/{item_sku}/orders",
            post(handlers::items::record_order),
        )
        .route(
            "/{business_id}/statistics",
            get(handlers::statistics::get_statistics),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // O mesmo segmento serve de businessId na listagem e de milestoneId
    // no hide, então o nome do parâmetro precisa coincidir.
    let milestone_routes = Router::new()
        .route("/{id}", get(handlers::milestones::list_milestones))
        .route("/{id}/hide", post(handlers::milestones::hide_milestone))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/businesses", business_routes)
        .nest("/api/milestones", milestone_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
