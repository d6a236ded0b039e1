// src/handlers/items.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::item::{
        CreateItemPayload, CreateOrderPayload, Item, ItemDetail, ItemOrder, ItemSummary,
        StockUpdatePayload, StockUpdateView,
    },
};

// GET /api/businesses/{businessId}/items
#[utoipa::path(
    get,
    path = "/api/businesses/{business_id}/items",
    params(("business_id" = Uuid, Path, description = "Identificador do negócio")),
    responses(
        (status = 200, description = "Itens do negócio", body = Vec<ItemSummary>),
        (status = 401, description = "Negócio não pertence ao token")
    ),
    security(("bearer_auth" = [])),
    tag = "items"
)]
pub async fn list_items(
    State(app_state): State<AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    Path(business_id): Path<Uuid>,
) -> Result<Json<Vec<ItemSummary>>, AppError> {
    let items = app_state
        .item_service
        .list_items(session.claims_business_id, business_id)
        .await?;

    Ok(Json(items))
}

// POST /api/businesses/{businessId}/items
#[utoipa::path(
    post,
    path = "/api/businesses/{business_id}/items",
    params(("business_id" = Uuid, Path, description = "Identificador do negócio")),
    request_body = CreateItemPayload,
    responses(
        (status = 201, description = "Item criado", body = Item),
        (status = 401, description = "Negócio não pertence ao token"),
        (status = 409, description = "SKU ou nome já usados no negócio")
    ),
    security(("bearer_auth" = [])),
    tag = "items"
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    Path(business_id): Path<Uuid>,
    Json(payload): Json<CreateItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let item = app_state
        .item_service
        .create_item(session.claims_business_id, business_id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

// GET /api/businesses/{businessId}/items/{itemSku}
#[utoipa::path(
    get,
    path = "/api/businesses/{business_id}/items/{item_sku}",
    params(
        ("business_id" = Uuid, Path, description = "Identificador do negócio"),
        ("item_sku" = String, Path, description = "SKU do item")
    ),
    responses(
        (status = 200, description = "Detalhe do item com histórico", body = ItemDetail),
        (status = 404, description = "Item não encontrado")
    ),
    security(("bearer_auth" = [])),
    tag = "items"
)]
pub async fn get_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    Path((business_id, item_sku)): Path<(Uuid, String)>,
) -> Result<Json<ItemDetail>, AppError> {
    let detail = app_state
        .item_service
        .get_item(session.claims_business_id, business_id, &item_sku)
        .await?;

    Ok(Json(detail))
}

// DELETE /api/businesses/{businessId}/items/{itemSku}
#[utoipa::path(
    delete,
    path = "/api/businesses/{business_id}/items/{item_sku}",
    params(
        ("business_id" = Uuid, Path, description = "Identificador do negócio"),
        ("item_sku" = String, Path, description = "SKU do item")
    ),
    responses(
        (status = 204, description = "Item removido"),
        (status = 404, description = "Item não encontrado")
    ),
    security(("bearer_auth" = [])),
    tag = "items"
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    Path((business_id, item_sku)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .item_service
        .delete_item(session.claims_business_id, business_id, &item_sku)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/businesses/{businessId}/categories
#[utoipa::path(
    get,
    path = "/api/businesses/{business_id}/categories",
    params(("business_id" = Uuid, Path, description = "Identificador do negócio")),
    responses(
        (status = 200, description = "Categorias distintas do negócio", body = Vec<String>),
        (status = 401, description = "Negócio não pertence ao token")
    ),
    security(("bearer_auth" = [])),
    tag = "items"
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    Path(business_id): Path<Uuid>,
) -> Result<Json<Vec<String>>, AppError> {
    let categories = app_state
        .item_service
        .list_categories(session.claims_business_id, business_id)
        .await?;

    Ok(Json(categories))
}

// POST /api/businesses/{businessId}/items/{itemSku}/stock
#[utoipa::path(
    post,
    path = "/api/businesses/{business_id}/items/{item_sku}/stock",
    params(
        ("business_id" = Uuid, Path, description = "Identificador do negócio"),
        ("item_sku" = String, Path, description = "SKU do item")
    ),
    request_body = StockUpdatePayload,
    responses(
        (status = 201, description = "Evento de estoque registrado", body = StockUpdateView),
        (status = 400, description = "Estoque insuficiente ou payload inválido"),
        (status = 404, description = "Item não encontrado")
    ),
    security(("bearer_auth" = [])),
    tag = "stock"
)]
pub async fn record_stock_update(
    State(app_state): State<AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    Path((business_id, item_sku)): Path<(Uuid, String)>,
    Json(payload): Json<StockUpdatePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let update = app_state
        .item_service
        .record_stock_update(session.claims_business_id, business_id, &item_sku, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(update)))
}

// POST /api/businesses/{businessId}/items/{itemSku}/orders
#[utoipa::path(
    post,
    path = "/api/businesses/{business_id}/items/{item_sku}/orders",
    params(
        ("business_id" = Uuid, Path, description = "Identificador do negócio"),
        ("item_sku" = String, Path, description = "SKU do item")
    ),
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido registrado", body = ItemOrder),
        (status = 404, description = "Item não encontrado")
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn record_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
    Path((business_id, item_sku)): Path<(Uuid, String)>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state
        .item_service
        .record_order(session.claims_business_id, business_id, &item_sku, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}
