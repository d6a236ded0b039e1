// src/models/business.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Representa um negócio vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Dados para criação de um negócio
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessPayload {
    #[validate(length(min = 1, max = 128, message = "O nome do negócio é obrigatório."))]
    pub name: String,

    #[validate(length(max = 512, message = "A descrição pode ter no máximo 512 caracteres."))]
    pub description: Option<String>,
}

// Resposta da criação: o negócio e um novo token de acesso
// que já carrega o businessId nas claims.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessResponse {
    pub business: Business,
    pub token: String,
}
