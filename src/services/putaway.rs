//! Putaway workflow: PENDING -> ASSIGNED -> IN_PROGRESS -> COMPLETED.
//!
//! Completion is the only transition with side effects beyond the item
//! itself: it creates the inventory lot and the RECEIPT movement in the same
//! transaction.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::inventory_lot::{self, LotStatus};
use crate::entities::putaway_item::{self, PutawayStatus};
use crate::entities::stock_movement::MovementType;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::ledger::{self, NewMovement};
use crate::services::sequences;

#[derive(Debug, Clone)]
pub struct NewPutaway {
    pub material_id: i64,
    pub batch_number: String,
    pub quantity: Decimal,
    pub unit: String,
    pub expiry_date: Option<NaiveDate>,
    pub goods_receipt_item_id: Option<Uuid>,
    pub qa_release_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct LocationAssignment {
    pub location_id: i64,
    pub zone: Option<String>,
    pub rack: Option<String>,
    pub shelf: Option<String>,
    pub position: Option<String>,
    pub temperature: Option<Decimal>,
    pub humidity: Option<Decimal>,
    pub assigned_by: String,
}

#[derive(Clone)]
pub struct PutawayService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl PutawayService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, new))]
    pub async fn create(&self, new: NewPutaway) -> Result<putaway_item::Model, ServiceError> {
        if new.quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "putaway quantity must be positive, got {}",
                new.quantity
            )));
        }

        let item = self
            .db
            .transaction::<_, putaway_item::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let putaway_number =
                        sequences::next_number(txn, sequences::PUTAWAY_PREFIX).await?;
                    let now = Utc::now();
                    putaway_item::ActiveModel {
                        putaway_number: Set(putaway_number),
                        material_id: Set(new.material_id),
                        batch_number: Set(new.batch_number),
                        quantity: Set(new.quantity),
                        unit: Set(new.unit),
                        expiry_date: Set(new.expiry_date),
                        goods_receipt_item_id: Set(new.goods_receipt_item_id),
                        qa_release_id: Set(new.qa_release_id),
                        status: Set(PutawayStatus::Pending.as_str().to_string()),
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

        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<putaway_item::Model, ServiceError> {
        putaway_item::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("putaway item {}", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<PutawayStatus>,
    ) -> Result<Vec<putaway_item::Model>, ServiceError> {
        let mut query = putaway_item::Entity::find();
        if let Some(status) = status {
            query = query.filter(putaway_item::Column::Status.eq(status.as_str()));
        }
        query
            .order_by_asc(putaway_item::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Chooses (or re-chooses) the target location. Allowed from PENDING and
    /// ASSIGNED; once picking has started the location is fixed.
    #[instrument(skip(self, assignment))]
    pub async fn assign_location(
        &self,
        id: i64,
        assignment: LocationAssignment,
    ) -> Result<putaway_item::Model, ServiceError> {
        let item = self
            .db
            .transaction::<_, putaway_item::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let item = find_item(txn, id).await?;
                    match PutawayStatus::from_str(&item.status) {
                        Some(PutawayStatus::Pending) | Some(PutawayStatus::Assigned) => {}
                        _ => {
                            return Err(ServiceError::invalid_state(
                                &format!("putaway item {}", item.id),
                                &item.status,
                                "PENDING or ASSIGNED",
                            ))
                        }
                    }

                    let now = Utc::now();
                    let mut active: putaway_item::ActiveModel = item.into();
                    active.status = Set(PutawayStatus::Assigned.as_str().to_string());
                    active.location_id = Set(Some(assignment.location_id));
                    active.zone = Set(assignment.zone);
                    active.rack = Set(assignment.rack);
                    active.shelf = Set(assignment.shelf);
                    active.position = Set(assignment.position);
                    active.temperature = Set(assignment.temperature);
                    active.humidity = Set(assignment.humidity);
                    active.assigned_by = Set(Some(assignment.assigned_by));
                    active.assigned_at = Set(Some(now));
                    active.updated_at = Set(now);
                    active.update(txn).await.map_err(ServiceError::db_error)
                })
            })
            .await?;

        Ok(item)
    }

    /// ASSIGNED -> IN_PROGRESS: an operator has begun moving the stock.
    #[instrument(skip(self))]
    pub async fn start(&self, id: i64) -> Result<putaway_item::Model, ServiceError> {
        let item = self
            .db
            .transaction::<_, putaway_item::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let item = find_item(txn, id).await?;
                    if PutawayStatus::from_str(&item.status) != Some(PutawayStatus::Assigned) {
                        return Err(ServiceError::invalid_state(
                            &format!("putaway item {}", item.id),
                            &item.status,
                            PutawayStatus::Assigned.as_str(),
                        ));
                    }

                    let mut active: putaway_item::ActiveModel = item.into();
                    active.status = Set(PutawayStatus::InProgress.as_str().to_string());
                    active.updated_at = Set(Utc::now());
                    active.update(txn).await.map_err(ServiceError::db_error)
                })
            })
            .await?;

        Ok(item)
    }

    /// Completes the putaway: creates the lot, writes the RECEIPT movement
    /// and marks the item COMPLETED, all in one transaction.
    #[instrument(skip(self))]
    pub async fn complete(
        &self,
        id: i64,
        completed_by: String,
    ) -> Result<(putaway_item::Model, inventory_lot::Model), ServiceError> {
        let (item, lot) = self
            .db
            .transaction::<_, (putaway_item::Model, inventory_lot::Model), ServiceError>(
                move |txn| {
                    Box::pin(async move {
                        let item = find_item(txn, id).await?;
                        match PutawayStatus::from_str(&item.status) {
                            Some(PutawayStatus::Assigned) | Some(PutawayStatus::InProgress) => {}
                            _ => {
                                return Err(ServiceError::invalid_state(
                                    &format!("putaway item {}", item.id),
                                    &item.status,
                                    "ASSIGNED or IN_PROGRESS",
                                ))
                            }
                        }
                        if item.location_id.is_none() {
                            return Err(ServiceError::MissingData(format!(
                                "putaway item {} has no assigned location",
                                item.id
                            )));
                        }

                        let now = Utc::now();
                        let lot = inventory_lot::ActiveModel {
                            material_id: Set(item.material_id),
                            batch_number: Set(item.batch_number.clone()),
                            quantity: Set(item.quantity),
                            unit: Set(item.unit.clone()),
                            location_id: Set(item.location_id),
                            zone: Set(item.zone.clone()),
                            rack: Set(item.rack.clone()),
                            shelf: Set(item.shelf.clone()),
                            position: Set(item.position.clone()),
                            status: Set(LotStatus::Available.as_str().to_string()),
                            expiry_date: Set(item.expiry_date),
                            temperature: Set(item.temperature),
                            humidity: Set(item.humidity),
                            goods_receipt_item_id: Set(item.goods_receipt_item_id),
                            qa_release_id: Set(item.qa_release_id),
                            created_at: Set(now),
                            updated_at: Set(now),
                            ..Default::default()
                        }
                        .insert(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                        ledger::record_movement(
                            txn,
                            NewMovement {
                                movement_type: MovementType::Receipt,
                                material_id: item.material_id,
                                batch_number: item.batch_number.clone(),
                                quantity: item.quantity,
                                unit: item.unit.clone(),
                                from_location_id: None,
                                to_location_id: item.location_id,
                                reference_id: item
                                    .goods_receipt_item_id
                                    .or(item.qa_release_id),
                                reference_type: Some("PUTAWAY".to_string()),
                                performed_by: completed_by.clone(),
                            },
                        )
                        .await?;

                        let mut active: putaway_item::ActiveModel = item.into();
                        active.status = Set(PutawayStatus::Completed.as_str().to_string());
                        active.completed_by = Set(Some(completed_by));
                        active.completed_at = Set(Some(now));
                        active.updated_at = Set(now);
                        let item =
                            active.update(txn).await.map_err(ServiceError::db_error)?;

                        Ok((item, lot))
                    })
                },
            )
            .await?;

        self.event_sender
            .send(Event::PutawayCompleted {
                putaway_id: item.id,
                lot_id: lot.id,
                material_id: lot.material_id,
                quantity: lot.quantity,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok((item, lot))
    }
}

async fn find_item<C: sea_orm::ConnectionTrait>(
    conn: &C,
    id: i64,
) -> Result<putaway_item::Model, ServiceError> {
    putaway_item::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::NotFound(format!("putaway item {}", id)))
}
