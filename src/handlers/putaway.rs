use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::{
    inventory_lot,
    putaway_item::{self, PutawayStatus},
};
use crate::errors::ServiceError;
use crate::services::putaway::{LocationAssignment, NewPutaway};
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePutawayRequest {
    pub material_id: i64,
    #[validate(length(min = 1))]
    pub batch_number: String,
    pub quantity: Decimal,
    #[validate(length(min = 1))]
    pub unit: String,
    pub expiry_date: Option<NaiveDate>,
    pub goods_receipt_item_id: Option<Uuid>,
    pub qa_release_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssignLocationRequest {
    pub location_id: i64,
    pub zone: Option<String>,
    pub rack: Option<String>,
    pub shelf: Option<String>,
    pub position: Option<String>,
    pub temperature: Option<Decimal>,
    pub humidity: Option<Decimal>,
    #[validate(length(min = 1))]
    pub assigned_by: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompletePutawayRequest {
    #[validate(length(min = 1))]
    pub completed_by: String,
}

#[derive(Debug, Deserialize)]
pub struct PutawayQuery {
    pub status: Option<String>,
}

/// Completion returns both the finished item and the lot it produced.
#[derive(Debug, Serialize)]
pub struct CompletedPutaway {
    pub putaway: putaway_item::Model,
    pub lot: inventory_lot::Model,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/putaway", get(list_putaway).post(create_putaway))
        .route("/putaway/:id", get(get_putaway))
        .route("/putaway/:id/assign-location", post(assign_location))
        .route("/putaway/:id/start", post(start_putaway))
        .route("/putaway/:id/complete", post(complete_putaway))
}

async fn create_putaway(
    State(state): State<AppState>,
    Json(request): Json<CreatePutawayRequest>,
) -> Result<(StatusCode, Json<ApiResponse<putaway_item::Model>>), ServiceError> {
    request.validate()?;
    let item = state
        .services
        .putaway
        .create(NewPutaway {
            material_id: request.material_id,
            batch_number: request.batch_number,
            quantity: request.quantity,
            unit: request.unit,
            expiry_date: request.expiry_date,
            goods_receipt_item_id: request.goods_receipt_item_id,
            qa_release_id: request.qa_release_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(item))))
}

async fn get_putaway(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<putaway_item::Model> {
    let item = state.services.putaway.get(id).await?;
    Ok(Json(ApiResponse::success(item)))
}

async fn list_putaway(
    State(state): State<AppState>,
    Query(query): Query<PutawayQuery>,
) -> ApiResult<Vec<putaway_item::Model>> {
    let status = query
        .status
        .map(|s| {
            PutawayStatus::from_str(&s).ok_or_else(|| {
                ServiceError::ValidationError(format!("unknown putaway status {}", s))
            })
        })
        .transpose()?;
    let items = state.services.putaway.list(status).await?;
    Ok(Json(ApiResponse::success(items)))
}

async fn assign_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AssignLocationRequest>,
) -> ApiResult<putaway_item::Model> {
    request.validate()?;
    let item = state
        .services
        .putaway
        .assign_location(
            id,
            LocationAssignment {
                location_id: request.location_id,
                zone: request.zone,
                rack: request.rack,
                shelf: request.shelf,
                position: request.position,
                temperature: request.temperature,
                humidity: request.humidity,
                assigned_by: request.assigned_by,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(item)))
}

async fn start_putaway(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<putaway_item::Model> {
    let item = state.services.putaway.start(id).await?;
    Ok(Json(ApiResponse::success(item)))
}

async fn complete_putaway(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CompletePutawayRequest>,
) -> ApiResult<CompletedPutaway> {
    request.validate()?;
    let (putaway, lot) = state
        .services
        .putaway
        .complete(id, request.completed_by)
        .await?;
    Ok(Json(ApiResponse::success(CompletedPutaway { putaway, lot })))
}
