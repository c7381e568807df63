use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::stock_movement::{self, MovementType};
use crate::errors::ServiceError;
use crate::services::ledger::MovementFilter;
use crate::{ApiResponse, ApiResult, AppState, PaginatedResponse};

#[derive(Debug, Deserialize)]
pub struct MovementQuery {
    pub material_id: Option<i64>,
    pub batch_number: Option<String>,
    pub movement_type: Option<String>,
    pub reference_id: Option<Uuid>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}
fn default_per_page() -> u64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct OnHandQuery {
    pub material_id: i64,
    pub batch_number: String,
}

#[derive(Debug, Serialize)]
pub struct OnHandResponse {
    pub material_id: i64,
    pub batch_number: String,
    pub on_hand: Decimal,
}

/// The ledger is read-only over HTTP: movements are only ever written by the
/// workflows that cause them.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/movements", get(list_movements))
        .route("/movements/on-hand", get(on_hand))
        .route("/movements/:id", get(get_movement))
}

async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<MovementQuery>,
) -> ApiResult<PaginatedResponse<stock_movement::Model>> {
    let movement_type = query
        .movement_type
        .map(|t| {
            MovementType::from_str(&t).ok_or_else(|| {
                ServiceError::ValidationError(format!("unknown movement type {}", t))
            })
        })
        .transpose()?;

    let (movements, total) = state
        .services
        .ledger
        .list_movements(
            MovementFilter {
                material_id: query.material_id,
                batch_number: query.batch_number,
                movement_type,
                reference_id: query.reference_id,
            },
            query.page,
            query.per_page,
        )
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        movements,
        total,
        query.page,
        query.per_page,
    ))))
}

async fn get_movement(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<stock_movement::Model> {
    let movement = state.services.ledger.get_movement(id).await?;
    Ok(Json(ApiResponse::success(movement)))
}

async fn on_hand(
    State(state): State<AppState>,
    Query(query): Query<OnHandQuery>,
) -> ApiResult<OnHandResponse> {
    let on_hand = state
        .services
        .ledger
        .on_hand(query.material_id, &query.batch_number)
        .await?;
    Ok(Json(ApiResponse::success(OnHandResponse {
        material_id: query.material_id,
        batch_number: query.batch_number,
        on_hand,
    })))
}
