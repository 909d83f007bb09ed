//! Pricing component routes
//!
//! Commission, fee and tax rule management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{DataResponse, MessageResponse};
use crate::app::AppState;
use crate::domain::{ComponentType, PricingComponentRequest};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentListQuery {
    #[serde(default, rename = "type")]
    pub component_type: Option<ComponentType>,
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct TotalRateQuery {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalRateResponse {
    pub component_type: ComponentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Percentage total, 20 means 20%
    pub total_rate: Decimal,
}

/// GET /pricing-components
///
/// List components in insertion order, optionally by type or active only.
pub async fn list_components(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ComponentListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let components = state
        .catalog
        .list_components(query.component_type, query.active_only)
        .await?;
    Ok(Json(DataResponse::new(components)))
}

/// GET /pricing-components/:component_id
pub async fn get_component(
    State(state): State<Arc<AppState>>,
    Path(component_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let component = state.catalog.get_component(component_id).await?;
    Ok(Json(DataResponse::new(component)))
}

/// GET /pricing-components/total-rate?type=commission&level=pleno
///
/// Sum of active percentage values of one type, scoped by level when given.
pub async fn get_total_rate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TotalRateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let total_rate = state
        .catalog
        .total_rate(query.component_type, query.level.as_deref())
        .await?;

    Ok(Json(DataResponse::new(TotalRateResponse {
        component_type: query.component_type,
        level: query.level,
        total_rate,
    })))
}

/// POST /pricing-components
pub async fn create_component(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PricingComponentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = req.id.unwrap_or_else(Uuid::new_v4);
    let component = state.catalog.add_component(req.into_component(id)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(component))))
}

/// PUT /pricing-components/:component_id
pub async fn update_component(
    State(state): State<Arc<AppState>>,
    Path(component_id): Path<Uuid>,
    Json(req): Json<PricingComponentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let component = state.catalog.update_component(req.into_component(component_id)).await?;
    Ok(Json(DataResponse::new(component)))
}

/// DELETE /pricing-components/:component_id
pub async fn delete_component(
    State(state): State<Arc<AppState>>,
    Path(component_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.catalog.delete_component(component_id).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::with_code(
            "Pricing component deleted successfully",
            "PRICING_COMPONENT_DELETED",
        )),
    ))
}
