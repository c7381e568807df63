//! Append-only stock-movement ledger.
//!
//! Writes happen through [`record_movement`] inside the transaction of the
//! workflow that caused the movement. The service itself only queries; no
//! update or delete path exists anywhere.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::stock_movement::{self, signed_quantity, MovementType};
use crate::errors::ServiceError;
use crate::services::sequences;

/// Payload for a ledger append. The movement number and timestamp are filled
/// in by the writer.
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub movement_type: MovementType,
    pub material_id: i64,
    pub batch_number: String,
    pub quantity: Decimal,
    pub unit: String,
    pub from_location_id: Option<i64>,
    pub to_location_id: Option<i64>,
    pub reference_id: Option<Uuid>,
    pub reference_type: Option<String>,
    pub performed_by: String,
}

/// Appends one movement inside the caller's transaction, numbering it from
/// the shared sequence counter.
pub async fn record_movement<C: ConnectionTrait>(
    conn: &C,
    new: NewMovement,
) -> Result<stock_movement::Model, ServiceError> {
    let movement_number = sequences::next_number(conn, sequences::MOVEMENT_PREFIX).await?;

    stock_movement::ActiveModel {
        movement_number: Set(movement_number),
        movement_type: Set(new.movement_type.as_str().to_string()),
        material_id: Set(new.material_id),
        batch_number: Set(new.batch_number),
        quantity: Set(new.quantity),
        unit: Set(new.unit),
        from_location_id: Set(new.from_location_id),
        to_location_id: Set(new.to_location_id),
        reference_id: Set(new.reference_id),
        reference_type: Set(new.reference_type),
        performed_by: Set(new.performed_by),
        performed_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(ServiceError::db_error)
}

/// Typed filter for ledger queries. Absent fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    pub material_id: Option<i64>,
    pub batch_number: Option<String>,
    pub movement_type: Option<MovementType>,
    pub reference_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct LedgerService {
    db: Arc<DbPool>,
}

impl LedgerService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn get_movement(&self, id: i64) -> Result<stock_movement::Model, ServiceError> {
        stock_movement::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("stock movement {}", id)))
    }

    /// Lists movements newest first, paginated. Ordering is by id so repeated
    /// reads with no intervening writes are identical.
    #[instrument(skip(self))]
    pub async fn list_movements(
        &self,
        filter: MovementFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<stock_movement::Model>, u64), ServiceError> {
        let mut query = stock_movement::Entity::find();
        if let Some(material_id) = filter.material_id {
            query = query.filter(stock_movement::Column::MaterialId.eq(material_id));
        }
        if let Some(batch) = filter.batch_number {
            query = query.filter(stock_movement::Column::BatchNumber.eq(batch));
        }
        if let Some(movement_type) = filter.movement_type {
            query = query.filter(stock_movement::Column::MovementType.eq(movement_type.as_str()));
        }
        if let Some(reference_id) = filter.reference_id {
            query = query.filter(stock_movement::Column::ReferenceId.eq(reference_id));
        }

        let paginator = query
            .order_by_desc(stock_movement::Column::Id)
            .paginate(&*self.db, per_page.max(1));
        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::db_error)?;
        let movements = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((movements, total))
    }

    /// On-hand quantity for a material+batch as the ledger sees it: the sum
    /// of signed movement quantities. Reconciles with lot quantities.
    #[instrument(skip(self))]
    pub async fn on_hand(
        &self,
        material_id: i64,
        batch_number: &str,
    ) -> Result<Decimal, ServiceError> {
        let movements = stock_movement::Entity::find()
            .filter(stock_movement::Column::MaterialId.eq(material_id))
            .filter(stock_movement::Column::BatchNumber.eq(batch_number))
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(movements.iter().map(signed_quantity).sum())
    }
}
