// src/handlers/milestones.rs

use axum::{extract::{Path, State}, Json};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::milestone::Milestone,
};

// GET /api/milestones/{businessId}
#[utoipa::path(
    get,
    path = "/api/milestones/{business_id}",
    params(("business_id" = Uuid, Path, description = "Identificador do negócio")),
    responses(
        (status = 200, description = "Marcos do negócio", body = Vec<Milestone>),
        (status = 401, description = "Negócio não pertence ao token")
    ),
    security(("bearer_auth" = [])),
    tag = "milestones"
)]
pub async fn list_milestones(
    State(app_state): State<AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    Path(business_id): Path<Uuid>,
) -> Result<Json<Vec<Milestone>>, AppError> {
    let milestones = app_state
        .milestone_service
        .list_milestones(session.claims_business_id, business_id)
        .await?;

    Ok(Json(milestones))
}

// POST /api/milestones/{milestoneId}/hide
#[utoipa::path(
    post,
    path = "/api/milestones/{milestone_id}/hide",
    params(("milestone_id" = Uuid, Path, description = "Identificador do marco")),
    responses(
        (status = 200, description = "Marco ocultado do painel", body = Milestone),
        (status = 404, description = "Marco não encontrado")
    ),
    security(("bearer_auth" = [])),
    tag = "milestones"
)]
pub async fn hide_milestone(
    State(app_state): State<AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    Path(milestone_id): Path<Uuid>,
) -> Result<Json<Milestone>, AppError> {
    let milestone = app_state
        .milestone_service
        .hide_milestone(session.claims_business_id, milestone_id)
        .await?;

    Ok(Json(milestone))
}
