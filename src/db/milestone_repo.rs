// src/db/milestone_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::milestone::Milestone};

#[derive(Clone)]
pub struct MilestoneRepository {
    pool: PgPool,
}

impl MilestoneRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_milestone<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        item_sku: &str,
        item_name: &str,
        total_sales: i64,
        reached_at: DateTime<Utc>,
    ) -> Result<Milestone, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let milestone = sqlx::query_as::<_, Milestone>(
            r#"
            INSERT INTO milestones (business_id, item_sku, item_name, total_sales, reached_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(business_id)
        .bind(item_sku)
        .bind(item_name)
        .bind(total_sales)
        .bind(reached_at)
        .fetch_one(executor)
        .await?;

        Ok(milestone)
    }

    pub async fn list_for_business(&self, business_id: Uuid) -> Result<Vec<Milestone>, AppError> {
        let milestones = sqlx::query_as::<_, Milestone>(
            "SELECT * FROM milestones WHERE business_id = $1 ORDER BY reached_at DESC",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(milestones)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Milestone>, AppError> {
        let maybe_milestone =
            sqlx::query_as::<_, Milestone>("SELECT * FROM milestones WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_milestone)
    }

    // Rungs já atingidos por um item, para não recriar marcos
    pub async fn existing_rungs<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        item_sku: &str,
    ) -> Result<Vec<i64>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rungs = sqlx::query_scalar::<_, i64>(
            "SELECT total_sales FROM milestones WHERE business_id = $1 AND item_sku = $2",
        )
        .bind(business_id)
        .bind(item_sku)
        .fetch_all(executor)
        .await?;
        Ok(rungs)
    }

    pub async fn hide_milestone(&self, id: Uuid) -> Result<Milestone, AppError> {
        let milestone = sqlx::query_as::<_, Milestone>(
            r#"
            UPDATE milestones
            SET display_milestone = FALSE
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::MilestoneNotFound)?;

        Ok(milestone)
    }
}
