// src/services/milestone_service.rs

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ItemRepository, MilestoneRepository},
    models::milestone::Milestone,
    services::auth::check_business,
};

// A escada fixa de marcos de venda
pub const MILESTONE_LADDER: [i64; 7] = [10, 50, 100, 500, 1000, 5000, 10000];

// Degraus recém-cruzados: já alcançados pelo volume total e ainda sem marco
pub fn crossed_rungs(total_sales: i64, existing: &[i64]) -> Vec<i64> {
    MILESTONE_LADDER
        .iter()
        .copied()
        .filter(|rung| total_sales >= *rung && !existing.contains(rung))
        .collect()
}

#[derive(Clone)]
pub struct MilestoneService {
    milestone_repo: MilestoneRepository,
    item_repo: ItemRepository,
}

impl MilestoneService {
    pub fn new(milestone_repo: MilestoneRepository, item_repo: ItemRepository) -> Self {
        Self {
            milestone_repo,
            item_repo,
        }
    }

    // Roda depois de cada evento "Sale", dentro da transação do evento,
    // para que o marco e o evento entrem (ou caiam) juntos.
    pub async fn detect_after_sale(
        &self,
        conn: &mut PgConnection,
        business_id: Uuid,
        item_sku: &str,
        item_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Milestone>, AppError> {
        let total_sales = self
            .item_repo
            .total_sales_for_item(&mut *conn, business_id, item_sku)
            .await?;
        let existing = self
            .milestone_repo
            .existing_rungs(&mut *conn, business_id, item_sku)
            .await?;

        let mut created = Vec::new();
        for rung in crossed_rungs(total_sales, &existing) {
            let milestone = self
                .milestone_repo
                .insert_milestone(&mut *conn, business_id, item_sku, item_name, rung, now)
                .await?;
            tracing::info!(
                "🏆 Marco de {} vendas atingido pelo item {}",
                rung,
                item_sku
            );
            created.push(milestone);
        }

        Ok(created)
    }

    pub async fn list_milestones(
        &self,
        claims_business_id: Option<Uuid>,
        business_id: Uuid,
    ) -> Result<Vec<Milestone>, AppError> {
        check_business(claims_business_id, business_id)?;
        self.milestone_repo.list_for_business(business_id).await
    }

    // Esconde um marco do painel; a posse vem do negócio gravado no marco
    pub async fn hide_milestone(
        &self,
        claims_business_id: Option<Uuid>,
        milestone_id: Uuid,
    ) -> Result<Milestone, AppError> {
        let milestone = self
            .milestone_repo
            .find_by_id(milestone_id)
            .await?
            .ok_or(AppError::MilestoneNotFound)?;

        check_business(claims_business_id, milestone.business_id)?;

        self.milestone_repo.hide_milestone(milestone_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escada_cruza_todos_os_degraus_alcancados() {
        assert_eq!(crossed_rungs(9, &[]), Vec::<i64>::new());
        assert_eq!(crossed_rungs(10, &[]), vec![10]);
        assert_eq!(crossed_rungs(120, &[]), vec![10, 50, 100]);
        assert_eq!(crossed_rungs(120, &[10, 50]), vec![100]);
        assert_eq!(
            crossed_rungs(20000, &[10, 50, 100, 500, 1000, 5000, 10000]),
            Vec::<i64>::new()
        );
    }

    #[test]
    fn escada_nao_recria_marco_existente() {
        assert_eq!(crossed_rungs(55, &[10, 50]), Vec::<i64>::new());
    }
}
