// src/services/business_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{BusinessRepository, UserRepository},
    models::{
        auth::User,
        business::{CreateBusinessPayload, CreateBusinessResponse},
    },
    services::auth::AuthService,
};

#[derive(Clone)]
pub struct BusinessService {
    business_repo: BusinessRepository,
    user_repo: UserRepository,
    auth_service: AuthService,
    pool: PgPool,
}

impl BusinessService {
    pub fn new(
        business_repo: BusinessRepository,
        user_repo: UserRepository,
        auth_service: AuthService,
        pool: PgPool,
    ) -> Self {
        Self {
            business_repo,
            user_repo,
            auth_service,
            pool,
        }
    }

    // Cria o negócio, carimba o dono e devolve um token novo que já
    // carrega o businessId nas claims.
    pub async fn create_business(
        &self,
        user: &User,
        payload: &CreateBusinessPayload,
    ) -> Result<CreateBusinessResponse, AppError> {
        if user.business_id.is_some() {
            return Err(AppError::BusinessAlreadyExists);
        }

        let mut tx = self.pool.begin().await?;

        let business = self
            .business_repo
            .create_business(
                &mut *tx,
                user.id,
                &payload.name,
                payload.description.as_deref(),
            )
            .await?;

        self.user_repo
            .set_business_id(&mut *tx, user.id, business.id)
            .await?;

        tx.commit().await?;

        let token = self.auth_service.create_token(user.id, Some(business.id))?;

        Ok(CreateBusinessResponse { business, token })
    }
}
