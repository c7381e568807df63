use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::entities::temperature_log::{self, TemperatureStatus};
use crate::errors::ServiceError;
use crate::services::temperature::NewTemperatureLog;
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTemperatureLogRequest {
    pub location_id: i64,
    pub reading: Decimal,
    pub min_threshold: Option<Decimal>,
    pub max_threshold: Option<Decimal>,
    #[validate(length(min = 1))]
    pub recorded_by: String,
}

#[derive(Debug, Deserialize)]
pub struct TemperatureLogQuery {
    pub location_id: Option<i64>,
    pub status: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/temperature-logs", get(list_logs).post(create_log))
}

async fn create_log(
    State(state): State<AppState>,
    Json(request): Json<CreateTemperatureLogRequest>,
) -> Result<(StatusCode, Json<ApiResponse<temperature_log::Model>>), ServiceError> {
    request.validate()?;
    let log = state
        .services
        .temperature
        .record(NewTemperatureLog {
            location_id: request.location_id,
            reading: request.reading,
            min_threshold: request.min_threshold,
            max_threshold: request.max_threshold,
            recorded_by: request.recorded_by,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(log))))
}

async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<TemperatureLogQuery>,
) -> ApiResult<Vec<temperature_log::Model>> {
    let status = query
        .status
        .map(|s| {
            TemperatureStatus::from_str(&s).ok_or_else(|| {
                ServiceError::ValidationError(format!("unknown temperature status {}", s))
            })
        })
        .transpose()?;
    let logs = state
        .services
        .temperature
        .list(query.location_id, status)
        .await?;
    Ok(Json(ApiResponse::success(logs)))
}
