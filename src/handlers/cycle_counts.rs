use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::entities::cycle_count::{self, CycleCountStatus};
use crate::errors::ServiceError;
use crate::services::cycle_counts::NewCycleCount;
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateCycleCountRequest {
    pub material_id: i64,
    pub batch_number: Option<String>,
    pub location_id: Option<i64>,
    pub expected_quantity: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct CycleCountQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StartCycleCountRequest {
    #[validate(length(min = 1))]
    pub performed_by: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCycleCountRequest {
    pub counted_quantity: Decimal,
    pub notes: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cycle-counts", get(list_counts).post(create_count))
        .route("/cycle-counts/:id", get(get_count).put(update_count))
        .route("/cycle-counts/:id/start", post(start_count))
        .route("/cycle-counts/:id/complete", post(complete_count))
}

async fn create_count(
    State(state): State<AppState>,
    Json(request): Json<CreateCycleCountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<cycle_count::Model>>), ServiceError> {
    let count = state
        .services
        .cycle_counts
        .create(NewCycleCount {
            material_id: request.material_id,
            batch_number: request.batch_number,
            location_id: request.location_id,
            expected_quantity: request.expected_quantity,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(count))))
}

async fn get_count(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<cycle_count::Model> {
    let count = state.services.cycle_counts.get(id).await?;
    Ok(Json(ApiResponse::success(count)))
}

async fn list_counts(
    State(state): State<AppState>,
    Query(query): Query<CycleCountQuery>,
) -> ApiResult<Vec<cycle_count::Model>> {
    let status = query
        .status
        .map(|s| {
            CycleCountStatus::from_str(&s).ok_or_else(|| {
                ServiceError::ValidationError(format!("unknown cycle count status {}", s))
            })
        })
        .transpose()?;
    let counts = state.services.cycle_counts.list(status).await?;
    Ok(Json(ApiResponse::success(counts)))
}

async fn start_count(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<StartCycleCountRequest>,
) -> ApiResult<cycle_count::Model> {
    request.validate()?;
    let count = state
        .services
        .cycle_counts
        .start(id, request.performed_by)
        .await?;
    Ok(Json(ApiResponse::success(count)))
}

async fn update_count(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateCycleCountRequest>,
) -> ApiResult<cycle_count::Model> {
    let count = state
        .services
        .cycle_counts
        .update(id, request.counted_quantity, request.notes)
        .await?;
    Ok(Json(ApiResponse::success(count)))
}

async fn complete_count(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<cycle_count::Model> {
    let count = state.services.cycle_counts.complete(id).await?;
    Ok(Json(ApiResponse::success(count)))
}
