use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::entities::{
    issue_reservation,
    material_issue::{self, IssueStatus},
};
use crate::errors::ServiceError;
use crate::services::material_issues::{MaterialIssueFilter, NewMaterialIssue};
use crate::{ApiResponse, ApiResult, AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateIssueRequest {
    pub material_id: i64,
    pub batch_number: Option<String>,
    pub quantity: Decimal,
    #[validate(length(min = 1))]
    pub unit: String,
    pub from_location_id: Option<i64>,
    pub to_location_id: Option<i64>,
    pub work_order_id: Option<Uuid>,
    pub batch_id: Option<Uuid>,
    pub reference_id: Option<Uuid>,
    #[validate(length(min = 1))]
    pub requested_by: String,
}

#[derive(Debug, Deserialize)]
pub struct IssueQuery {
    pub material_id: Option<i64>,
    pub status: Option<String>,
    pub work_order_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ActorRequest {
    #[validate(length(min = 1))]
    pub performed_by: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/material-issues", get(list_issues).post(create_issue))
        .route("/material-issues/:id", get(get_issue))
        .route("/material-issues/:id/reservations", get(get_reservations))
        .route("/material-issues/:id/approve", post(approve_issue))
        .route("/material-issues/:id/pick", post(pick_issue))
        .route("/material-issues/:id/issue", post(issue_issue))
}

async fn create_issue(
    State(state): State<AppState>,
    Json(request): Json<CreateIssueRequest>,
) -> Result<(StatusCode, Json<ApiResponse<material_issue::Model>>), ServiceError> {
    request.validate()?;
    let issue = state
        .services
        .material_issues
        .create(NewMaterialIssue {
            material_id: request.material_id,
            batch_number: request.batch_number,
            quantity: request.quantity,
            unit: request.unit,
            from_location_id: request.from_location_id,
            to_location_id: request.to_location_id,
            work_order_id: request.work_order_id,
            batch_id: request.batch_id,
            reference_id: request.reference_id,
            requested_by: request.requested_by,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(issue))))
}

async fn get_issue(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<material_issue::Model> {
    let issue = state.services.material_issues.get(id).await?;
    Ok(Json(ApiResponse::success(issue)))
}

async fn list_issues(
    State(state): State<AppState>,
    Query(query): Query<IssueQuery>,
) -> ApiResult<Vec<material_issue::Model>> {
    let status = query
        .status
        .map(|s| {
            IssueStatus::from_str(&s).ok_or_else(|| {
                ServiceError::ValidationError(format!("unknown issue status {}", s))
            })
        })
        .transpose()?;
    let issues = state
        .services
        .material_issues
        .list(MaterialIssueFilter {
            material_id: query.material_id,
            status,
            work_order_id: query.work_order_id,
        })
        .await?;
    Ok(Json(ApiResponse::success(issues)))
}

async fn get_reservations(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<issue_reservation::Model>> {
    let reservations = state.services.material_issues.reservations(id).await?;
    Ok(Json(ApiResponse::success(reservations)))
}

async fn approve_issue(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ActorRequest>,
) -> ApiResult<material_issue::Model> {
    request.validate()?;
    let issue = state
        .services
        .material_issues
        .approve(id, request.performed_by)
        .await?;
    Ok(Json(ApiResponse::success(issue)))
}

async fn pick_issue(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ActorRequest>,
) -> ApiResult<material_issue::Model> {
    request.validate()?;
    let issue = state
        .services
        .material_issues
        .pick(id, request.performed_by)
        .await?;
    Ok(Json(ApiResponse::success(issue)))
}

async fn issue_issue(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ActorRequest>,
) -> ApiResult<material_issue::Model> {
    request.validate()?;
    let issue = state
        .services
        .material_issues
        .issue(id, request.performed_by)
        .await?;
    Ok(Json(ApiResponse::success(issue)))
}
