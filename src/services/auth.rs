// src/services/auth.rs

use std::sync::{Arc, Mutex};

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::{rngs::StdRng, Rng};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AuthResponse, Claims, RegisterUserPayload, User},
};

const REFRESH_TOKEN_LEN: usize = 64;
const REFRESH_TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const REFRESH_TOKEN_VALIDITY_DAYS: i64 = 90;
const ACCESS_TOKEN_VALIDITY_DAYS: i64 = 7;

// Sessão autenticada: o usuário e o business_id que veio NAS CLAIMS.
// A checagem de posse usa o valor do token, não o da linha do banco,
// então um token emitido antes de criar o negócio continua sem acesso.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub claims_business_id: Option<Uuid>,
}

// Compara o negócio das claims com o negócio do recurso pedido
pub fn check_business(
    claims_business_id: Option<Uuid>,
    business_id: Uuid,
) -> Result<(), AppError> {
    match claims_business_id {
        Some(owned) if owned == business_id => Ok(()),
        _ => Err(AppError::BusinessAccessDenied),
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: PgPool,
    // RNG injetado na montagem do AppState, nunca uma fonte global
    rng: Arc<Mutex<StdRng>>,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: PgPool, rng: StdRng) -> Self {
        Self {
            user_repo,
            jwt_secret,
            pool,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<AuthResponse, AppError> {
        // 1. Hashing (fora da transação, não toca no banco)
        let password_clone = payload.password.clone();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let refresh_token = self.generate_refresh_token()?;
        let refresh_token_expiry = Utc::now() + chrono::Duration::days(REFRESH_TOKEN_VALIDITY_DAYS);

        // 2. Cria o usuário dentro de uma transação
        let mut tx = self.pool.begin().await?;

        let new_user = self
            .user_repo
            .create_user(
                &mut *tx,
                &payload.email,
                &hashed_password,
                &payload.first_name,
                &payload.last_name,
                &refresh_token,
                refresh_token_expiry,
            )
            .await?;

        tx.commit().await?;

        // 3. Gera o token de acesso
        let token = self.create_token(new_user.id, new_user.business_id)?;
        Ok(AuthResponse {
            token,
            refresh_token,
        })
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Login bem-sucedido rotaciona o refresh token
        let refresh_token = self.rotate_refresh_token(user.id).await?;
        let token = self.create_token(user.id, user.business_id)?;

        Ok(AuthResponse {
            token,
            refresh_token,
        })
    }

    // Troca um refresh token válido por um novo par de tokens
    pub async fn refresh_access_token(
        &self,
        email: &str,
        refresh_token: &str,
    ) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if user.refresh_token != refresh_token {
            return Err(AppError::InvalidToken);
        }
        if user.refresh_token_expiry <= Utc::now() {
            return Err(AppError::RefreshTokenExpired);
        }

        let new_refresh_token = self.rotate_refresh_token(user.id).await?;
        let token = self.create_token(user.id, user.business_id)?;

        Ok(AuthResponse {
            token,
            refresh_token: new_refresh_token,
        })
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthSession, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        Ok(AuthSession {
            user,
            claims_business_id: token_data.claims.business_id,
        })
    }

    pub fn create_token(&self, user_id: Uuid, business_id: Option<Uuid>) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(ACCESS_TOKEN_VALIDITY_DAYS);

        let claims = Claims {
            sub: user_id,
            business_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    async fn rotate_refresh_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let refresh_token = self.generate_refresh_token()?;
        let expiry = Utc::now() + chrono::Duration::days(REFRESH_TOKEN_VALIDITY_DAYS);
        self.user_repo
            .update_refresh_token(&self.pool, user_id, &refresh_token, expiry)
            .await?;
        Ok(refresh_token)
    }

    // 64 caracteres maiúsculos/dígitos vindos do RNG injetado
    fn generate_refresh_token(&self) -> Result<String, AppError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow::anyhow!("RNG da aplicação indisponível"))?;

        let token = (0..REFRESH_TOKEN_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..REFRESH_TOKEN_CHARSET.len());
                REFRESH_TOKEN_CHARSET[idx] as char
            })
            .collect();
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posse_exige_negocio_igual_ao_do_recurso() {
        let owned = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(check_business(Some(owned), owned).is_ok());
        assert!(matches!(
            check_business(Some(owned), other),
            Err(AppError::BusinessAccessDenied)
        ));
        assert!(matches!(
            check_business(None, owned),
            Err(AppError::BusinessAccessDenied)
        ));
    }
}
