use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::entities::{storage_location, warehouse};
use crate::errors::ServiceError;
use crate::services::warehouses::{NewStorageLocation, NewWarehouse};
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWarehouseRequest {
    #[validate(length(min = 1))]
    pub code: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub address: Option<String>,
    #[serde(default)]
    pub temperature_controlled: bool,
    pub min_temperature: Option<Decimal>,
    pub max_temperature: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLocationRequest {
    #[validate(length(min = 1))]
    pub code: String,
    pub zone: Option<String>,
    pub rack: Option<String>,
    pub shelf: Option<String>,
    pub position: Option<String>,
    pub capacity: Option<Decimal>,
    #[serde(default)]
    pub temperature_controlled: bool,
    pub min_temperature: Option<Decimal>,
    pub max_temperature: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct WarehouseQuery {
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub warehouse_id: Option<i64>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/warehouses", get(list_warehouses).post(create_warehouse))
        .route("/warehouses/:id", get(get_warehouse))
        .route("/warehouses/:id/deactivate", post(deactivate_warehouse))
        .route(
            "/warehouses/:id/locations",
            get(list_warehouse_locations).post(create_location),
        )
        .route("/locations", get(list_locations))
        .route("/locations/:id", get(get_location))
}

async fn create_warehouse(
    State(state): State<AppState>,
    Json(request): Json<CreateWarehouseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<warehouse::Model>>), ServiceError> {
    request.validate()?;
    let created = state
        .services
        .warehouses
        .create_warehouse(NewWarehouse {
            code: request.code,
            name: request.name,
            address: request.address,
            temperature_controlled: request.temperature_controlled,
            min_temperature: request.min_temperature,
            max_temperature: request.max_temperature,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

async fn get_warehouse(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<warehouse::Model> {
    let found = state.services.warehouses.get_warehouse(id).await?;
    Ok(Json(ApiResponse::success(found)))
}

async fn list_warehouses(
    State(state): State<AppState>,
    Query(query): Query<WarehouseQuery>,
) -> ApiResult<Vec<warehouse::Model>> {
    let warehouses = state
        .services
        .warehouses
        .list_warehouses(query.active_only)
        .await?;
    Ok(Json(ApiResponse::success(warehouses)))
}

async fn deactivate_warehouse(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<warehouse::Model> {
    let updated = state.services.warehouses.deactivate_warehouse(id).await?;
    Ok(Json(ApiResponse::success(updated)))
}

async fn create_location(
    State(state): State<AppState>,
    Path(warehouse_id): Path<i64>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<storage_location::Model>>), ServiceError> {
    request.validate()?;
    let created = state
        .services
        .warehouses
        .create_location(NewStorageLocation {
            warehouse_id,
            code: request.code,
            zone: request.zone,
            rack: request.rack,
            shelf: request.shelf,
            position: request.position,
            capacity: request.capacity,
            temperature_controlled: request.temperature_controlled,
            min_temperature: request.min_temperature,
            max_temperature: request.max_temperature,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

async fn list_warehouse_locations(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<storage_location::Model>> {
    state.services.warehouses.get_warehouse(id).await?;
    let locations = state.services.warehouses.list_locations(Some(id)).await?;
    Ok(Json(ApiResponse::success(locations)))
}

async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<storage_location::Model> {
    let found = state.services.warehouses.get_location(id).await?;
    Ok(Json(ApiResponse::success(found)))
}

async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> ApiResult<Vec<storage_location::Model>> {
    let locations = state
        .services
        .warehouses
        .list_locations(query.warehouse_id)
        .await?;
    Ok(Json(ApiResponse::success(locations)))
}
