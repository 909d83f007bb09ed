//! Product routes
//!
//! Product CRUD plus pricing previews. Every write is priced before it is
//! stored.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{DataResponse, MessageResponse, Paginated, PaginationParams};
use crate::app::AppState;
use crate::domain::{ProductDraft, Selection};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionQuoteResponse {
    pub product_id: Uuid,
    pub final_price: Decimal,
    pub package_price: Decimal,
    pub selection: Selection,
}

/// GET /products
///
/// List stored products with their last computed prices.
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let products = state.catalog.list_products().await?;

    tracing::debug!(
        total = products.len(),
        page = pagination.page(),
        per_page = pagination.per_page(),
        "Listing products"
    );

    Ok(Paginated::from_items(products, &pagination))
}

/// GET /products/:product_id
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state.catalog.get_product(product_id).await?;
    Ok(Json(DataResponse::new(product)))
}

/// POST /products
///
/// Create a product. Rejected with 422 when the task graph is malformed.
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ProductDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state.catalog.add_product(draft).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(product))))
}

/// PUT /products/:product_id
///
/// Replace a product's structure and re-price it.
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<Uuid>,
    Json(mut draft): Json<ProductDraft>,
) -> Result<impl IntoResponse, ApiError> {
    draft.id = product_id;
    let product = state.catalog.update_product(draft).await?;
    Ok(Json(DataResponse::new(product)))
}

/// DELETE /products/:product_id
///
/// Delete a product with all of its tasks and steps.
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.catalog.delete_product(product_id).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::with_code("Product deleted successfully", "PRODUCT_DELETED")),
    ))
}

/// POST /products/quote
///
/// Price a draft against the current configuration without storing it.
pub async fn quote_product(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ProductDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let priced = state.catalog.quote_product(&draft).await?;
    Ok(Json(DataResponse::new(priced)))
}

/// POST /products/:product_id/quote
///
/// Package price of a stored product for a variation/add-on selection.
pub async fn quote_selection(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<Uuid>,
    Json(selection): Json<Selection>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state.catalog.get_product(product_id).await?;
    let package_price = state.catalog.quote_selection(product_id, &selection).await?;

    Ok(Json(DataResponse::new(SelectionQuoteResponse {
        product_id,
        final_price: product.product.final_price(),
        package_price,
        selection,
    })))
}

/// POST /products/recompute
///
/// Re-price every stored product against the current rate table and rule
/// set. Products that fail keep their last prices and are listed.
pub async fn recompute_products(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let report = state.catalog.recompute_all_products().await?;

    tracing::info!(
        recomputed = report.recomputed,
        failed = report.failed.len(),
        "Recomputed products"
    );

    Ok(Json(DataResponse::new(report)))
}
