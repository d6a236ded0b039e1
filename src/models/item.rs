// src/models/item.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Representa um item do catálogo vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub business_id: Uuid,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha da listagem: item + total de pedidos abertos + estoque disponível.
// availableStock = stock - totalOrders, calculado na consulta.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub sku: String,
    pub business_id: Uuid,
    pub category: String,
    pub name: String,
    pub stock: i64,
    pub total_orders: i64,
    pub available_stock: i64,
}

// Um evento imutável de alteração de estoque
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StockUpdate {
    pub id: Uuid,
    pub business_id: Uuid,
    pub item_sku: String,
    pub amount_changed: i64,
    pub reason: String,
    pub date_time_added: String,
}

// Visão do evento no histórico de um item
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdateView {
    pub amount_changed: i64,
    pub reason: String,
    pub date_time_added: String,
}

impl From<StockUpdate> for StockUpdateView {
    fn from(update: StockUpdate) -> Self {
        Self {
            amount_changed: update.amount_changed,
            reason: update.reason,
            date_time_added: update.date_time_added,
        }
    }
}

// Detalhe de um item com o seu histórico de estoque
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    pub sku: String,
    pub business_id: Uuid,
    pub category: String,
    pub name: String,
    pub stock: i64,
    pub history: Vec<StockUpdateView>,
}

// Um pedido registrado para um item
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemOrder {
    pub id: Uuid,
    pub business_id: Uuid,
    pub item_sku: String,
    pub amount_ordered: i64,
    pub date_time_added: String,
}

// SKU: 1 a 20 caracteres, alfanuméricos ou hífens
fn validate_sku(sku: &str) -> Result<(), ValidationError> {
    let valid = sku.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !valid {
        let mut err = ValidationError::new("sku");
        err.message = Some("O SKU só pode conter letras, dígitos e hífens.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_non_zero(amount: i64) -> Result<(), ValidationError> {
    if amount == 0 {
        let mut err = ValidationError::new("non_zero");
        err.message = Some("A alteração de estoque não pode ser zero.".into());
        return Err(err);
    }
    Ok(())
}

// Dados para criação de um item
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemPayload {
    #[validate(
        length(min = 1, max = 20, message = "O SKU deve ter entre 1 e 20 caracteres."),
        custom(function = "validate_sku")
    )]
    pub sku: String,

    #[validate(length(min = 1, max = 128, message = "O nome do item é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, max = 64, message = "A categoria é obrigatória."))]
    pub category: String,

    #[validate(range(min = 0, message = "O estoque inicial não pode ser negativo."))]
    pub stock: i64,
}

// Dados para registrar uma alteração de estoque
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdatePayload {
    #[validate(custom(function = "validate_non_zero"))]
    pub amount_changed: i64,

    #[validate(length(min = 1, max = 64, message = "O motivo é obrigatório."))]
    pub reason: String,
}

// Dados para registrar um pedido
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[validate(range(min = 1, message = "A quantidade pedida deve ser positiva."))]
    pub amount_ordered: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sku_aceita_alfanumerico_e_hifen() {
        assert!(validate_sku("ABC-123").is_ok());
        assert!(validate_sku("abc123").is_ok());
    }

    #[test]
    fn sku_rejeita_espacos_e_simbolos() {
        assert!(validate_sku("ABC 123").is_err());
        assert!(validate_sku("ABC_123").is_err());
    }

    #[test]
    fn alteracao_de_estoque_zero_falha() {
        let payload = StockUpdatePayload {
            amount_changed: 0,
            reason: "Sale".to_string(),
        };
        assert!(payload.validate().is_err());

        let payload = StockUpdatePayload {
            amount_changed: -5,
            reason: "Sale".to_string(),
        };
        assert!(payload.validate().is_ok());
    }
}
