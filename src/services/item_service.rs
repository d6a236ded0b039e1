// src/services/item_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ItemRepository,
    models::item::{
        CreateItemPayload, CreateOrderPayload, Item, ItemDetail, ItemOrder, ItemSummary,
        StockUpdatePayload, StockUpdateView,
    },
    services::{auth::check_business, milestone_service::MilestoneService},
};

#[derive(Clone)]
pub struct ItemService {
    item_repo: ItemRepository,
    milestone_service: MilestoneService,
    pool: PgPool,
}

impl ItemService {
    pub fn new(
        item_repo: ItemRepository,
        milestone_service: MilestoneService,
        pool: PgPool,
    ) -> Self {
        Self {
            item_repo,
            milestone_service,
            pool,
        }
    }

    pub async fn list_items(
        &self,
        claims_business_id: Option<Uuid>,
        business_id: Uuid,
    ) -> Result<Vec<ItemSummary>, AppError> {
        check_business(claims_business_id, business_id)?;
        self.item_repo.list_items(business_id).await
    }

    pub async fn create_item(
        &self,
        claims_business_id: Option<Uuid>,
        business_id: Uuid,
        payload: &CreateItemPayload,
    ) -> Result<Item, AppError> {
        check_business(claims_business_id, business_id)?;

        self.item_repo
            .create_item(
                &self.pool,
                business_id,
                &payload.sku,
                &payload.name,
                &payload.category,
                payload.stock,
            )
            .await
    }

    // Detalhe do item com o histórico completo de alterações de estoque
    pub async fn get_item(
        &self,
        claims_business_id: Option<Uuid>,
        business_id: Uuid,
        sku: &str,
    ) -> Result<ItemDetail, AppError> {
        check_business(claims_business_id, business_id)?;

        let item = self
            .item_repo
            .find_item(business_id, sku)
            .await?
            .ok_or(AppError::ItemNotFound)?;

        let history = self
            .item_repo
            .list_stock_updates(business_id, sku)
            .await?
            .into_iter()
            .map(StockUpdateView::from)
            .collect();

        Ok(ItemDetail {
            sku: item.sku,
            business_id: item.business_id,
            category: item.category,
            name: item.name,
            stock: item.stock,
            history,
        })
    }

    pub async fn delete_item(
        &self,
        claims_business_id: Option<Uuid>,
        business_id: Uuid,
        sku: &str,
    ) -> Result<(), AppError> {
        check_business(claims_business_id, business_id)?;

        let deleted = self.item_repo.delete_item(business_id, sku).await?;
        if !deleted {
            return Err(AppError::ItemNotFound);
        }
        Ok(())
    }

    pub async fn list_categories(
        &self,
        claims_business_id: Option<Uuid>,
        business_id: Uuid,
    ) -> Result<Vec<String>, AppError> {
        check_business(claims_business_id, business_id)?;
        self.item_repo.list_categories(business_id).await
    }

    // Registra um evento de estoque: aplica o delta, grava o evento
    // imutável e, em venda, dispara a detecção de marcos. Tudo na mesma
    // transação.
    pub async fn record_stock_update(
        &self,
        claims_business_id: Option<Uuid>,
        business_id: Uuid,
        sku: &str,
        payload: &StockUpdatePayload,
    ) -> Result<StockUpdateView, AppError> {
        check_business(claims_business_id, business_id)?;

        let now = Utc::now();
        let timestamp = now.to_rfc3339();

        let mut tx = self.pool.begin().await?;

        let item = self
            .item_repo
            .apply_stock_delta(&mut *tx, business_id, sku, payload.amount_changed)
            .await?;

        // O nível nunca fica negativo; o rollback desfaz o delta
        if item.stock < 0 {
            return Err(AppError::InsufficientStock);
        }

        let update = self
            .item_repo
            .insert_stock_update(
                &mut *tx,
                business_id,
                sku,
                payload.amount_changed,
                &payload.reason,
                &timestamp,
            )
            .await?;

        if payload.reason == "Sale" {
            self.milestone_service
                .detect_after_sale(&mut tx, business_id, sku, &item.name, now)
                .await?;
        }

        tx.commit().await?;

        Ok(StockUpdateView::from(update))
    }

    // Pedidos reduzem o estoque disponível na listagem, mas não mexem
    // no nível físico.
    pub async fn record_order(
        &self,
        claims_business_id: Option<Uuid>,
        business_id: Uuid,
        sku: &str,
        payload: &CreateOrderPayload,
    ) -> Result<ItemOrder, AppError> {
        check_business(claims_business_id, business_id)?;

        self.item_repo
            .find_item(business_id, sku)
            .await?
            .ok_or(AppError::ItemNotFound)?;

        let timestamp = Utc::now().to_rfc3339();
        self.item_repo
            .insert_order(&self.pool, business_id, sku, payload.amount_ordered, &timestamp)
            .await
    }
}
