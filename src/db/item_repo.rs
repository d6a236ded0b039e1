// src/db/item_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        item::{Item, ItemOrder, ItemSummary, StockUpdate},
        stats::{ItemStats, StockEvent},
    },
};

// Repositório do catálogo: itens, eventos de estoque e pedidos
#[derive(Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Listagem com total de pedidos e estoque disponível por item.
    // SUM em bigint vira numeric no Postgres, por isso o cast.
    pub async fn list_items(&self, business_id: Uuid) -> Result<Vec<ItemSummary>, AppError> {
        let items = sqlx::query_as::<_, ItemSummary>(
            r#"
            SELECT i.sku, i.business_id, i.category, i.name, i.stock,
                   COALESCE(SUM(o.amount_ordered), 0)::BIGINT AS total_orders,
                   (i.stock - COALESCE(SUM(o.amount_ordered), 0))::BIGINT AS available_stock
            FROM items i
            LEFT JOIN item_orders o
              ON o.business_id = i.business_id AND o.item_sku = i.sku
            WHERE i.business_id = $1
            GROUP BY i.business_id, i.sku, i.category, i.name, i.stock
            ORDER BY i.sku
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn find_item(
        &self,
        business_id: Uuid,
        sku: &str,
    ) -> Result<Option<Item>, AppError> {
        let maybe_item = sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE business_id = $1 AND sku = $2",
        )
        .bind(business_id)
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_item)
    }

    pub async fn create_item<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        sku: &str,
        name: &str,
        category: &str,
        stock: i64,
    ) -> Result<Item, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (business_id, sku, name, category, stock)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(business_id)
        .bind(sku)
        .bind(name)
        .bind(category)
        .bind(stock)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    if let Some(constraint) = db_err.constraint() {
                        return match constraint {
                            // Chave primária composta (business_id, sku)
                            "items_pkey" => AppError::SkuAlreadyExists,
                            // Índice único de nome por negócio
                            "items_business_id_name_key" => AppError::ItemNameAlreadyExists,
                            _ => AppError::SkuAlreadyExists,
                        };
                    }
                }
            }
            e.into()
        })?;

        Ok(item)
    }

    // Eventos e pedidos caem em cascata pelas foreign keys
    pub async fn delete_item(&self, business_id: Uuid, sku: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM items WHERE business_id = $1 AND sku = $2")
            .bind(business_id)
            .bind(sku)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_categories(&self, business_id: Uuid) -> Result<Vec<String>, AppError> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM items WHERE business_id = $1 ORDER BY category",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn list_stock_updates(
        &self,
        business_id: Uuid,
        sku: &str,
    ) -> Result<Vec<StockUpdate>, AppError> {
        let updates = sqlx::query_as::<_, StockUpdate>(
            r#"
            SELECT id, business_id, item_sku, amount_changed, reason, date_time_added
            FROM stock_updates
            WHERE business_id = $1 AND item_sku = $2
            ORDER BY created_at
            "#,
        )
        .bind(business_id)
        .bind(sku)
        .fetch_all(&self.pool)
        .await?;
        Ok(updates)
    }

    // Aplica o delta no nível de estoque do item
    pub async fn apply_stock_delta<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        sku: &str,
        delta: i64,
    ) -> Result<Item, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET stock = stock + $3, updated_at = now()
            WHERE business_id = $1 AND sku = $2
            RETURNING *
            "#,
        )
        .bind(business_id)
        .bind(sku)
        .bind(delta)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ItemNotFound)?;

        Ok(item)
    }

    pub async fn insert_stock_update<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        sku: &str,
        amount_changed: i64,
        reason: &str,
        date_time_added: &str,
    ) -> Result<StockUpdate, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let update = sqlx::query_as::<_, StockUpdate>(
            r#"
            INSERT INTO stock_updates (business_id, item_sku, amount_changed, reason, date_time_added)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, business_id, item_sku, amount_changed, reason, date_time_added
            "#,
        )
        .bind(business_id)
        .bind(sku)
        .bind(amount_changed)
        .bind(reason)
        .bind(date_time_added)
        .fetch_one(executor)
        .await?;

        Ok(update)
    }

    pub async fn insert_order<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        sku: &str,
        amount_ordered: i64,
        date_time_added: &str,
    ) -> Result<ItemOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, ItemOrder>(
            r#"
            INSERT INTO item_orders (business_id, item_sku, amount_ordered, date_time_added)
            VALUES ($1, $2, $3, $4)
            RETURNING id, business_id, item_sku, amount_ordered, date_time_added
            "#,
        )
        .bind(business_id)
        .bind(sku)
        .bind(amount_ordered)
        .bind(date_time_added)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }

    // Volume acumulado de vendas (valor absoluto) de um item
    pub async fn total_sales_for_item<'e, E>(
        &self,
        executor: E,
        business_id: Uuid,
        sku: &str,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(ABS(amount_changed)), 0)::BIGINT
            FROM stock_updates
            WHERE business_id = $1 AND item_sku = $2 AND reason = 'Sale'
            "#,
        )
        .bind(business_id)
        .bind(sku)
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    // Projeção completa para o motor de estatísticas: todos os itens do
    // negócio (ordenados por SKU) com os seus eventos na ordem de gravação.
    pub async fn fetch_item_stats(&self, business_id: Uuid) -> Result<Vec<ItemStats>, AppError> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE business_id = $1 ORDER BY sku",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        let updates = sqlx::query_as::<_, StockUpdate>(
            r#"
            SELECT id, business_id, item_sku, amount_changed, reason, date_time_added
            FROM stock_updates
            WHERE business_id = $1
            ORDER BY item_sku, created_at
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        let mut stats: Vec<ItemStats> = items
            .into_iter()
            .map(|item| ItemStats {
                sku: item.sku,
                name: item.name,
                category: item.category,
                stock_level: item.stock,
                events: Vec::new(),
            })
            .collect();

        for update in updates {
            // Um evento sem item correspondente viola uma invariante do esquema
            let stat = stats
                .iter_mut()
                .find(|s| s.sku == update.item_sku)
                .ok_or_else(|| {
                    AppError::InternalServerError(anyhow::anyhow!(
                        "evento de estoque órfão para o SKU {}",
                        update.item_sku
                    ))
                })?;
            stat.events.push(StockEvent {
                reason: update.reason,
                amount: update.amount_changed,
                timestamp: update.date_time_added,
            });
        }

        Ok(stats)
    }
}
