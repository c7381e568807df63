//! Material-issue workflow: PENDING -> APPROVED -> PICKED -> ISSUED.
//!
//! Availability is deliberately not checked at create; the PICK transition
//! invokes the allocation engine and is the first point that can fail with
//! `InsufficientInventory`.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::issue_reservation;
use crate::entities::material_issue::{self, IssueStatus};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::allocation;
use crate::services::sequences;

#[derive(Debug, Clone)]
pub struct NewMaterialIssue {
    pub material_id: i64,
    pub batch_number: Option<String>,
    pub quantity: Decimal,
    pub unit: String,
    pub from_location_id: Option<i64>,
    pub to_location_id: Option<i64>,
    pub work_order_id: Option<Uuid>,
    pub batch_id: Option<Uuid>,
    pub reference_id: Option<Uuid>,
    pub requested_by: String,
}

/// Typed filter for issue queries. Absent fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct MaterialIssueFilter {
    pub material_id: Option<i64>,
    pub status: Option<IssueStatus>,
    pub work_order_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct MaterialIssueService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl MaterialIssueService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, new))]
    pub async fn create(
        &self,
        new: NewMaterialIssue,
    ) -> Result<material_issue::Model, ServiceError> {
        if new.quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "issue quantity must be positive, got {}",
                new.quantity
            )));
        }

        let issue = self
            .db
            .transaction::<_, material_issue::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let issue_number =
                        sequences::next_number(txn, sequences::ISSUE_PREFIX).await?;
                    let now = Utc::now();
                    material_issue::ActiveModel {
                        issue_number: Set(issue_number),
                        material_id: Set(new.material_id),
                        batch_number: Set(new.batch_number),
                        quantity: Set(new.quantity),
                        unit: Set(new.unit),
                        from_location_id: Set(new.from_location_id),
                        to_location_id: Set(new.to_location_id),
                        work_order_id: Set(new.work_order_id),
                        batch_id: Set(new.batch_id),
                        reference_id: Set(new.reference_id),
                        status: Set(IssueStatus::Pending.as_str().to_string()),
                        requested_by: Set(new.requested_by),
                        requested_at: Set(now),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(ServiceError::db_error)
                })
            })
            .await?;

        Ok(issue)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<material_issue::Model, ServiceError> {
        material_issue::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("material issue {}", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: MaterialIssueFilter,
    ) -> Result<Vec<material_issue::Model>, ServiceError> {
        let mut query = material_issue::Entity::find();
        if let Some(material_id) = filter.material_id {
            query = query.filter(material_issue::Column::MaterialId.eq(material_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(material_issue::Column::Status.eq(status.as_str()));
        }
        if let Some(work_order_id) = filter.work_order_id {
            query = query.filter(material_issue::Column::WorkOrderId.eq(work_order_id));
        }
        query
            .order_by_asc(material_issue::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Reservations currently held by an issue (empty unless PICKED).
    #[instrument(skip(self))]
    pub async fn reservations(
        &self,
        id: i64,
    ) -> Result<Vec<issue_reservation::Model>, ServiceError> {
        issue_reservation::Entity::find()
            .filter(issue_reservation::Column::IssueId.eq(id))
            .order_by_asc(issue_reservation::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// PENDING -> APPROVED.
    #[instrument(skip(self))]
    pub async fn approve(
        &self,
        id: i64,
        approved_by: String,
    ) -> Result<material_issue::Model, ServiceError> {
        let issue = self
            .db
            .transaction::<_, material_issue::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let issue = find_issue(txn, id).await?;
                    require_status(&issue, IssueStatus::Pending)?;

                    let now = Utc::now();
                    let mut active: material_issue::ActiveModel = issue.into();
                    active.status = Set(IssueStatus::Approved.as_str().to_string());
                    active.approved_by = Set(Some(approved_by));
                    active.approved_at = Set(Some(now));
                    active.updated_at = Set(now);
                    active.update(txn).await.map_err(ServiceError::db_error)
                })
            })
            .await?;

        self.event_sender
            .send(Event::IssueApproved { issue_id: issue.id })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(issue)
    }

    /// APPROVED -> PICKED: reserves lots FEFO. On `InsufficientInventory`
    /// the transaction rolls back and the issue stays APPROVED with no
    /// reservations left behind.
    #[instrument(skip(self))]
    pub async fn pick(
        &self,
        id: i64,
        picked_by: String,
    ) -> Result<material_issue::Model, ServiceError> {
        let (issue, reservations) = self
            .db
            .transaction::<_, (material_issue::Model, Vec<issue_reservation::Model>), ServiceError>(
                move |txn| {
                    Box::pin(async move {
                        let issue = find_issue(txn, id).await?;
                        require_status(&issue, IssueStatus::Approved)?;

                        let reservations = allocation::reserve_for_issue(txn, &issue).await?;

                        let now = Utc::now();
                        let mut active: material_issue::ActiveModel = issue.into();
                        active.status = Set(IssueStatus::Picked.as_str().to_string());
                        active.picked_by = Set(Some(picked_by));
                        active.picked_at = Set(Some(now));
                        active.updated_at = Set(now);
                        let issue =
                            active.update(txn).await.map_err(ServiceError::db_error)?;

                        Ok((issue, reservations))
                    })
                },
            )
            .await?;

        self.event_sender
            .send(Event::IssuePicked {
                issue_id: issue.id,
                reservations: reservations
                    .iter()
                    .map(|r| (r.lot_id, r.reserved_quantity))
                    .collect(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(issue)
    }

    /// PICKED -> ISSUED: consumes the reserved lots and writes one
    /// CONSUMPTION movement per lot.
    #[instrument(skip(self))]
    pub async fn issue(
        &self,
        id: i64,
        issued_by: String,
    ) -> Result<material_issue::Model, ServiceError> {
        let (issue, outcome) = self
            .db
            .transaction::<_, (material_issue::Model, allocation::ConsumptionOutcome), ServiceError>(
                move |txn| {
                    Box::pin(async move {
                        let issue = find_issue(txn, id).await?;
                        require_status(&issue, IssueStatus::Picked)?;

                        let outcome =
                            allocation::consume_reserved(txn, &issue, &issued_by).await?;

                        let now = Utc::now();
                        let mut active: material_issue::ActiveModel = issue.into();
                        active.status = Set(IssueStatus::Issued.as_str().to_string());
                        active.issued_by = Set(Some(issued_by));
                        active.issued_at = Set(Some(now));
                        active.updated_at = Set(now);
                        let issue =
                            active.update(txn).await.map_err(ServiceError::db_error)?;

                        Ok((issue, outcome))
                    })
                },
            )
            .await?;

        self.event_sender
            .send(Event::IssueIssued {
                issue_id: issue.id,
                movement_ids: outcome.movements.iter().map(|m| m.id).collect(),
            })
            .await
            .map_err(ServiceError::EventError)?;
        for lot in &outcome.depleted_lots {
            self.event_sender
                .send(Event::LotDepleted {
                    lot_id: lot.id,
                    material_id: lot.material_id,
                    batch_number: lot.batch_number.clone(),
                })
                .await
                .map_err(ServiceError::EventError)?;
        }

        Ok(issue)
    }
}

async fn find_issue<C: sea_orm::ConnectionTrait>(
    conn: &C,
    id: i64,
) -> Result<material_issue::Model, ServiceError> {
    material_issue::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::NotFound(format!("material issue {}", id)))
}

fn require_status(
    issue: &material_issue::Model,
    required: IssueStatus,
) -> Result<(), ServiceError> {
    if IssueStatus::from_str(&issue.status) != Some(required) {
        return Err(ServiceError::invalid_state(
            &format!("material issue {}", issue.id),
            &issue.status,
            required.as_str(),
        ));
    }
    Ok(())
}
