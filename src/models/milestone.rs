// src/models/milestone.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// Um marco de vendas atingido por um item
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: Uuid,
    pub business_id: Uuid,
    pub item_sku: String,
    pub item_name: String,
    pub total_sales: i64,
    pub reached_at: DateTime<Utc>,
    pub display_milestone: bool,
}
