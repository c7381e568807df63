//! Lot store: create, query, adjust and relocate inventory lots.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, TransactionTrait,
};
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::inventory_lot::{self, LotStatus};
use crate::entities::issue_reservation;
use crate::entities::stock_movement::MovementType;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::allocation::compare_fefo;
use crate::services::ledger::{self, NewMovement};

#[derive(Debug, Clone)]
pub struct NewInventoryLot {
    pub material_id: i64,
    pub batch_number: String,
    pub quantity: Decimal,
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
    pub created_by: String,
}

/// Typed filter for lot queries. Absent fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct InventoryLotFilter {
    pub material_id: Option<i64>,
    pub batch_number: Option<String>,
    pub status: Option<LotStatus>,
    pub location_id: Option<i64>,
}

/// Result of an adjustment: the corrected lot, or nothing when the lot was
/// adjusted to zero and removed.
#[derive(Debug, Clone)]
pub enum LotAdjustment {
    Updated(inventory_lot::Model),
    Depleted,
}

#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl InventoryService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Creates a lot directly (goods receipt outside the putaway flow) and
    /// writes the matching RECEIPT movement so the ledger stays reconciled.
    #[instrument(skip(self, new))]
    pub async fn create_lot(
        &self,
        new: NewInventoryLot,
    ) -> Result<inventory_lot::Model, ServiceError> {
        if new.quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "lot quantity must be positive, got {}",
                new.quantity
            )));
        }

        let lot = self
            .db
            .transaction::<_, inventory_lot::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    let lot = inventory_lot::ActiveModel {
                        material_id: Set(new.material_id),
                        batch_number: Set(new.batch_number.clone()),
                        quantity: Set(new.quantity),
                        unit: Set(new.unit.clone()),
                        location_id: Set(new.location_id),
                        zone: Set(new.zone),
                        rack: Set(new.rack),
                        shelf: Set(new.shelf),
                        position: Set(new.position),
                        status: Set(LotStatus::Available.as_str().to_string()),
                        expiry_date: Set(new.expiry_date),
                        temperature: Set(new.temperature),
                        humidity: Set(new.humidity),
                        goods_receipt_item_id: Set(new.goods_receipt_item_id),
                        qa_release_id: Set(new.qa_release_id),
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
                            material_id: lot.material_id,
                            batch_number: lot.batch_number.clone(),
                            quantity: lot.quantity,
                            unit: lot.unit.clone(),
                            from_location_id: None,
                            to_location_id: lot.location_id,
                            reference_id: new.goods_receipt_item_id.or(new.qa_release_id),
                            reference_type: Some("GOODS_RECEIPT".to_string()),
                            performed_by: new.created_by.clone(),
                        },
                    )
                    .await?;

                    Ok(lot)
                })
            })
            .await?;

        self.event_sender
            .send(Event::LotCreated {
                lot_id: lot.id,
                material_id: lot.material_id,
                batch_number: lot.batch_number.clone(),
                quantity: lot.quantity,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(lot)
    }

    #[instrument(skip(self))]
    pub async fn get_lot(&self, id: i64) -> Result<inventory_lot::Model, ServiceError> {
        inventory_lot::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("inventory lot {}", id)))
    }

    /// Lists lots in FEFO order: expiry ascending, no-expiry last, ties by
    /// id. The sort runs in process so ordering is identical on every
    /// backend.
    #[instrument(skip(self))]
    pub async fn list_lots(
        &self,
        filter: InventoryLotFilter,
    ) -> Result<Vec<inventory_lot::Model>, ServiceError> {
        let mut query = inventory_lot::Entity::find();
        if let Some(material_id) = filter.material_id {
            query = query.filter(inventory_lot::Column::MaterialId.eq(material_id));
        }
        if let Some(batch) = filter.batch_number {
            query = query.filter(inventory_lot::Column::BatchNumber.eq(batch));
        }
        if let Some(status) = filter.status {
            query = query.filter(inventory_lot::Column::Status.eq(status.as_str()));
        }
        if let Some(location_id) = filter.location_id {
            query = query.filter(inventory_lot::Column::LocationId.eq(location_id));
        }

        let mut lots = query.all(&*self.db).await.map_err(ServiceError::db_error)?;
        lots.sort_by(|a, b| compare_fefo(a.expiry_date, a.id, b.expiry_date, b.id));
        Ok(lots)
    }

    /// Corrects a lot to `new_quantity` (cycle-count correction), writing an
    /// ADJUSTMENT movement for the signed delta. Adjusting to zero deletes
    /// the lot. Lots with open reservations cannot be adjusted.
    #[instrument(skip(self))]
    pub async fn adjust_lot(
        &self,
        id: i64,
        new_quantity: Decimal,
        performed_by: String,
    ) -> Result<LotAdjustment, ServiceError> {
        if new_quantity < Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "adjusted quantity cannot be negative, got {}",
                new_quantity
            )));
        }

        let outcome = self
            .db
            .transaction::<_, (LotAdjustment, Option<Event>), ServiceError>(move |txn| {
                Box::pin(async move {
                    let lot = inventory_lot::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("inventory lot {}", id))
                        })?;

                    let open_reservations = issue_reservation::Entity::find()
                        .filter(issue_reservation::Column::LotId.eq(lot.id))
                        .all(txn)
                        .await
                        .map_err(ServiceError::db_error)?;
                    if !open_reservations.is_empty() {
                        return Err(ServiceError::Conflict(format!(
                            "inventory lot {} has open reservations and cannot be adjusted",
                            lot.id
                        )));
                    }

                    let delta = new_quantity - lot.quantity;
                    if delta.is_zero() {
                        return Ok((LotAdjustment::Updated(lot), None));
                    }

                    let movement = ledger::record_movement(
                        txn,
                        NewMovement {
                            movement_type: MovementType::Adjustment,
                            material_id: lot.material_id,
                            batch_number: lot.batch_number.clone(),
                            quantity: delta,
                            unit: lot.unit.clone(),
                            from_location_id: lot.location_id,
                            to_location_id: lot.location_id,
                            reference_id: None,
                            reference_type: Some("CYCLE_COUNT".to_string()),
                            performed_by,
                        },
                    )
                    .await?;
                    let event = Event::MovementRecorded {
                        movement_id: movement.id,
                        movement_number: movement.movement_number,
                        movement_type: movement.movement_type,
                        quantity: movement.quantity,
                    };

                    if new_quantity.is_zero() {
                        inventory_lot::Entity::delete_by_id(lot.id)
                            .exec(txn)
                            .await
                            .map_err(ServiceError::db_error)?;
                        Ok((LotAdjustment::Depleted, Some(event)))
                    } else {
                        let mut active: inventory_lot::ActiveModel = lot.into();
                        active.quantity = Set(new_quantity);
                        active.updated_at = Set(Utc::now());
                        let updated =
                            active.update(txn).await.map_err(ServiceError::db_error)?;
                        Ok((LotAdjustment::Updated(updated), Some(event)))
                    }
                })
            })
            .await?;

        let (adjustment, event) = outcome;
        if let Some(event) = event {
            self.event_sender
                .send(event)
                .await
                .map_err(ServiceError::EventError)?;
        }

        Ok(adjustment)
    }

    /// Moves a lot to another storage location, writing a TRANSFER movement.
    /// Transfers do not change on-hand totals.
    #[instrument(skip(self))]
    pub async fn transfer_lot(
        &self,
        id: i64,
        to_location_id: i64,
        performed_by: String,
    ) -> Result<inventory_lot::Model, ServiceError> {
        let lot = self
            .db
            .transaction::<_, inventory_lot::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let lot = inventory_lot::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("inventory lot {}", id))
                        })?;

                    if lot.status == LotStatus::Reserved.as_str() {
                        return Err(ServiceError::invalid_state(
                            &format!("inventory lot {}", lot.id),
                            &lot.status,
                            LotStatus::Available.as_str(),
                        ));
                    }

                    ledger::record_movement(
                        txn,
                        NewMovement {
                            movement_type: MovementType::Transfer,
                            material_id: lot.material_id,
                            batch_number: lot.batch_number.clone(),
                            quantity: lot.quantity,
                            unit: lot.unit.clone(),
                            from_location_id: lot.location_id,
                            to_location_id: Some(to_location_id),
                            reference_id: None,
                            reference_type: Some("TRANSFER".to_string()),
                            performed_by,
                        },
                    )
                    .await?;

                    let mut active: inventory_lot::ActiveModel = lot.into();
                    active.location_id = Set(Some(to_location_id));
                    active.updated_at = Set(Utc::now());
                    active.update(txn).await.map_err(ServiceError::db_error)
                })
            })
            .await?;

        Ok(lot)
    }
}
