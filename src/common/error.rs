use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Refresh token expirado")]
    RefreshTokenExpired,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // O negócio do chamador não corresponde ao recurso pedido
    #[error("Acesso negado ao negócio")]
    BusinessAccessDenied,

    #[error("Usuário já possui um negócio")]
    BusinessAlreadyExists,

    #[error("Item não encontrado")]
    ItemNotFound,

    #[error("Marco não encontrado")]
    MilestoneNotFound,

    #[error("SKU já existe neste negócio")]
    SkuAlreadyExists,

    #[error("Nome de item já existe neste negócio")]
    ItemNameAlreadyExists,

    #[error("Estoque insuficiente para a baixa pedida")]
    InsufficientStock,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente.")
            }
            AppError::RefreshTokenExpired => {
                (StatusCode::UNAUTHORIZED, "Refresh token expirado. Faça login novamente.")
            }
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::BusinessAccessDenied => {
                (StatusCode::UNAUTHORIZED, "Você não tem acesso a este negócio.")
            }
            AppError::BusinessAlreadyExists => {
                (StatusCode::CONFLICT, "Este usuário já possui um negócio cadastrado.")
            }
            AppError::ItemNotFound => (StatusCode::NOT_FOUND, "Item não encontrado."),
            AppError::MilestoneNotFound => (StatusCode::NOT_FOUND, "Marco não encontrado."),
            AppError::SkuAlreadyExists => {
                (StatusCode::CONFLICT, "Já existe um item com este SKU neste negócio.")
            }
            AppError::ItemNameAlreadyExists => {
                (StatusCode::CONFLICT, "Já existe um item com este nome neste negócio.")
            }
            AppError::InsufficientStock => {
                (StatusCode::BAD_REQUEST, "A alteração deixaria o estoque negativo.")
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
