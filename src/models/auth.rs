// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,

    // Nulo até o usuário criar o seu negócio
    pub business_id: Option<Uuid>,

    pub account_status: String,
    pub role: String,

    #[serde(skip_serializing)]
    pub refresh_token: String,
    #[serde(skip_serializing)]
    pub refresh_token_expiry: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Nomes aceitam letras, apóstrofos, hífens e espaços
fn validate_person_name(name: &str) -> Result<(), ValidationError> {
    let valid = name
        .chars()
        .all(|c| c.is_alphabetic() || c == '\'' || c == '-' || c == ' ');
    if !valid {
        let mut err = ValidationError::new("person_name");
        err.message = Some("O nome contém caracteres inválidos.".into());
        return Err(err);
    }
    Ok(())
}

// Senha precisa de minúscula, maiúscula, dígito e caractere especial
fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());

    if !(has_lower && has_upper && has_digit && has_special) {
        let mut err = ValidationError::new("password_strength");
        err.message = Some(
            "A senha precisa de ao menos uma letra minúscula, uma maiúscula, um dígito e um caractere especial."
                .into(),
        );
        return Err(err);
    }
    Ok(())
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(
        length(min = 2, message = "O primeiro nome deve ter no mínimo 2 caracteres."),
        custom(function = "validate_person_name")
    )]
    pub first_name: String,

    #[validate(
        length(min = 2, message = "O sobrenome deve ter no mínimo 2 caracteres."),
        custom(function = "validate_person_name")
    )]
    pub last_name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(
        length(min = 8, max = 32, message = "A senha deve ter entre 8 e 32 caracteres."),
        custom(function = "validate_password_strength")
    )]
    pub password: String,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Dados para renovar o token de acesso
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "O refresh token é obrigatório."))]
    pub refresh_token: String,
}

// Resposta de autenticação com os tokens
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,                 // Subject (ID do usuário)
    pub business_id: Option<Uuid>, // Negócio do usuário (nulo antes de criar um)
    pub exp: usize,                // Expiration time (quando o token expira)
    pub iat: usize,                // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nome_aceita_apostrofo_hifen_e_espaco() {
        assert!(validate_person_name("Anne-Marie O'Neil").is_ok());
    }

    #[test]
    fn nome_rejeita_digitos_e_simbolos() {
        assert!(validate_person_name("R2D2").is_err());
        assert!(validate_person_name("nome!").is_err());
    }

    #[test]
    fn senha_forte_passa() {
        assert!(validate_password_strength("Senha123!").is_ok());
    }

    #[test]
    fn senha_sem_cada_classe_falha() {
        assert!(validate_password_strength("senha123!").is_err());
        assert!(validate_password_strength("SENHA123!").is_err());
        assert!(validate_password_strength("SenhaForte!").is_err());
        assert!(validate_password_strength("Senha1234").is_err());
    }

    #[test]
    fn payload_de_registro_valida_limites() {
        let payload = RegisterUserPayload {
            first_name: "A".to_string(),
            last_name: "Silva".to_string(),
            email: "a@exemplo.com".to_string(),
            password: "Senha123!".to_string(),
        };
        assert!(payload.validate().is_err());

        let payload = RegisterUserPayload {
            first_name: "Ana".to_string(),
            last_name: "Silva".to_string(),
            email: "a@exemplo.com".to_string(),
            password: "Senha123!".to_string(),
        };
        assert!(payload.validate().is_ok());
    }
}
