//! Specialty routes
//!
//! Rate table management endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::{DataResponse, MessageResponse};
use crate::app::AppState;
use crate::domain::SpecialtyRequest;
use crate::error::ApiError;

/// GET /specialties
///
/// List every specialty with its tier rates.
pub async fn list_specialties(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let specialties = state.catalog.list_specialties().await?;
    Ok(Json(DataResponse::new(specialties)))
}

/// GET /specialties/:specialty_id
pub async fn get_specialty(
    State(state): State<Arc<AppState>>,
    Path(specialty_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let specialty = state.catalog.get_specialty(specialty_id).await?;
    Ok(Json(DataResponse::new(specialty)))
}

/// POST /specialties
///
/// Create a specialty. The id is generated unless supplied.
pub async fn create_specialty(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpecialtyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = req.id.unwrap_or_else(Uuid::new_v4);
    let specialty = state.catalog.add_specialty(req.into_specialty(id)).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(specialty))))
}

/// PUT /specialties/:specialty_id
///
/// Replace a specialty. Stored products keep their prices until recomputed.
pub async fn update_specialty(
    State(state): State<Arc<AppState>>,
    Path(specialty_id): Path<Uuid>,
    Json(req): Json<SpecialtyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let specialty = state.catalog.update_specialty(req.into_specialty(specialty_id)).await?;
    Ok(Json(DataResponse::new(specialty)))
}

/// DELETE /specialties/:specialty_id
pub async fn delete_specialty(
    State(state): State<Arc<AppState>>,
    Path(specialty_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.catalog.delete_specialty(specialty_id).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::with_code(
            "Specialty deleted successfully",
            "SPECIALTY_DELETED",
        )),
    ))
}
