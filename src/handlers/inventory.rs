use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::entities::inventory_lot::{self, LotStatus};
use crate::errors::ServiceError;
use crate::services::inventory::{InventoryLotFilter, LotAdjustment, NewInventoryLot};
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLotRequest {
    pub material_id: i64,
    #[validate(length(min = 1))]
    pub batch_number: String,
    pub quantity: Decimal,
    #[validate(length(min = 1))]
    pub unit: String,
    pub location_id: Option<i64>,
    pub zone: Option<String>,
    pub rack: Option<String>,
    pub shelf: Option<String>,
    pub position: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub temperature: Option<Decimal>,
    pub humidity: Option<Decimal>,
    pub goods_receipt_item_id: Option<Uuid>,
    pub qa_release_id: Option<Uuid>,
    #[validate(length(min = 1))]
    pub created_by: String,
}

#[derive(Debug, Deserialize)]
pub struct LotQuery {
    pub material_id: Option<i64>,
    pub batch_number: Option<String>,
    pub status: Option<String>,
    pub location_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdjustLotRequest {
    pub new_quantity: Decimal,
    #[validate(length(min = 1))]
    pub performed_by: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TransferLotRequest {
    pub to_location_id: i64,
    #[validate(length(min = 1))]
    pub performed_by: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_lots).post(create_lot))
        .route("/inventory/:id", get(get_lot))
        .route("/inventory/:id/adjust", post(adjust_lot))
        .route("/inventory/:id/transfer", post(transfer_lot))
}

async fn create_lot(
    State(state): State<AppState>,
    Json(request): Json<CreateLotRequest>,
) -> Result<(StatusCode, Json<ApiResponse<inventory_lot::Model>>), ServiceError> {
    request.validate()?;
    let lot = state
        .services
        .inventory
        .create_lot(NewInventoryLot {
            material_id: request.material_id,
            batch_number: request.batch_number,
            quantity: request.quantity,
            unit: request.unit,
            location_id: request.location_id,
            zone: request.zone,
            rack: request.rack,
            shelf: request.shelf,
            position: request.position,
            expiry_date: request.expiry_date,
            temperature: request.temperature,
            humidity: request.humidity,
            goods_receipt_item_id: request.goods_receipt_item_id,
            qa_release_id: request.qa_release_id,
            created_by: request.created_by,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(lot))))
}

async fn get_lot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<inventory_lot::Model> {
    let lot = state.services.inventory.get_lot(id).await?;
    Ok(Json(ApiResponse::success(lot)))
}

async fn list_lots(
    State(state): State<AppState>,
    Query(query): Query<LotQuery>,
) -> ApiResult<Vec<inventory_lot::Model>> {
    let status = query
        .status
        .map(|s| {
            LotStatus::from_str(&s)
                .ok_or_else(|| ServiceError::ValidationError(format!("unknown lot status {}", s)))
        })
        .transpose()?;

    let lots = state
        .services
        .inventory
        .list_lots(InventoryLotFilter {
            material_id: query.material_id,
            batch_number: query.batch_number,
            status,
            location_id: query.location_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(lots)))
}

async fn adjust_lot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AdjustLotRequest>,
) -> ApiResult<Option<inventory_lot::Model>> {
    request.validate()?;
    let adjustment = state
        .services
        .inventory
        .adjust_lot(id, request.new_quantity, request.performed_by)
        .await?;
    let lot = match adjustment {
        LotAdjustment::Updated(lot) => Some(lot),
        LotAdjustment::Depleted => None,
    };
    Ok(Json(ApiResponse::success(lot)))
}

async fn transfer_lot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<TransferLotRequest>,
) -> ApiResult<inventory_lot::Model> {
    request.validate()?;
    let lot = state
        .services
        .inventory
        .transfer_lot(id, request.to_location_id, request.performed_by)
        .await?;
    Ok(Json(ApiResponse::success(lot)))
}
