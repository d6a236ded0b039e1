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
        handlers::auth::refresh,

        // --- Users ---
        handlers::auth::get_me,

        // --- Businesses ---
        handlers::businesses::create_business,

        // --- Items ---
        handlers::items::list_items,
        handlers::items::create_item,
        handlers::items::get_item,
        handlers::items::delete_item,
        handlers::items::list_categories,

        // --- Stock e Pedidos ---
        handlers::items::record_stock_update,
        handlers::items::record_order,

        // --- Milestones ---
        handlers::milestones::list_milestones,
        handlers::milestones::hide_milestone,

        // --- Statistics ---
        handlers::statistics::get_statistics,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::RefreshPayload,
            models::auth::AuthResponse,

            // --- Businesses ---
            models::business::Business,
            models::business::CreateBusinessPayload,
            models::business::CreateBusinessResponse,

            // --- Items ---
            models::item::Item,
            models::item::ItemSummary,
            models::item::ItemDetail,
            models::item::ItemOrder,
            models::item::StockUpdateView,
            models::item::CreateItemPayload,
            models::item::StockUpdatePayload,
            models::item::CreateOrderPayload,

            // --- Milestones ---
            models::milestone::Milestone,

            // --- Statistics ---
            models::stats::StatisticsResponse,
            models::stats::Suggestions,
            models::stats::RankedItem,
            models::stats::RankedCategory,
            models::stats::NoSalesSuggestion,
            models::stats::RestockSuggestion,
        )
    ),
    tags(
        (name = "auth", description = "Autenticação e Registro"),
        (name = "users", description = "Dados do Usuário e Perfil"),
        (name = "businesses", description = "Gestão do Negócio"),
        (name = "items", description = "Catálogo de Itens"),
        (name = "stock", description = "Eventos de Estoque"),
        (name = "orders", description = "Pedidos de Itens"),
        (name = "milestones", description = "Marcos de Venda"),
        (name = "statistics", description = "Estatísticas e Sugestões")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
