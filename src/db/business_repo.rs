// src/db/business_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::business::Business};

// A escrita participa da transação do serviço (criação do negócio +
// carimbo no dono), então o executor vem sempre de fora.
#[derive(Clone, Default)]
pub struct BusinessRepository;

impl BusinessRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_business<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Business, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let business = sqlx::query_as::<_, Business>(
            r#"
            INSERT INTO businesses (owner_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(name)
        .bind(description)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                // Um dono só pode ter um negócio (índice único em owner_id)
                if db_err.is_unique_violation() {
                    return AppError::BusinessAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(business)
    }
}
