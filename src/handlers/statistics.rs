// src/handlers/statistics.rs

use axum::{extract::{Path, State}, Json};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::stats::StatisticsResponse,
};

// GET /api/businesses/{businessId}/statistics
//
// Sempre responde 200 para um negócio válido; sem dados, os agregados
// vêm zerados e as sugestões ficam ausentes.
#[utoipa::path(
    get,
    path = "/api/businesses/{business_id}/statistics",
    params(("business_id" = Uuid, Path, description = "Identificador do negócio")),
    responses(
        (status = 200, description = "Painel de estatísticas e sugestões", body = StatisticsResponse),
        (status = 401, description = "Negócio não pertence ao token")
    ),
    security(("bearer_auth" = [])),
    tag = "statistics"
)]
pub async fn get_statistics(
    State(app_state): State<AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    Path(business_id): Path<Uuid>,
) -> Result<Json<StatisticsResponse>, AppError> {
    let response = app_state
        .statistics_service
        .get_statistics(session.claims_business_id, business_id)
        .await?;

    Ok(Json(response))
}
