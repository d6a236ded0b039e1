// src/handlers/businesses.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::business::{CreateBusinessPayload, CreateBusinessResponse},
};

// Cria o negócio do usuário autenticado. A resposta traz um token novo
// com o businessId já embutido nas claims.
#[utoipa::path(
    post,
    path = "/api/businesses",
    request_body = CreateBusinessPayload,
    responses(
        (status = 200, description = "Negócio criado", body = CreateBusinessResponse),
        (status = 401, description = "Token ausente ou inválido"),
        (status = 409, description = "Usuário já possui um negócio")
    ),
    security(("bearer_auth" = [])),
    tag = "businesses"
)]
pub async fn create_business(
    State(app_state): State<AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    Json(payload): Json<CreateBusinessPayload>,
) -> Result<Json<CreateBusinessResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state
        .business_service
        .create_business(&session.user, &payload)
        .await?;

    Ok(Json(response))
}
