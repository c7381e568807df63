//! Cycle counts: PLANNED -> IN_PROGRESS -> COMPLETED reconciliation tasks.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::instrument;

use crate::db::DbPool;
use crate::entities::cycle_count::{self, CycleCountStatus};
use crate::entities::inventory_lot;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::sequences;

/// Absolute variance below this is treated as no variance.
pub const VARIANCE_TOLERANCE: Decimal = dec!(0.01);

#[derive(Debug, Clone)]
pub struct NewCycleCount {
    pub material_id: i64,
    pub batch_number: Option<String>,
    pub location_id: Option<i64>,
    /// When absent, the expected quantity is snapshotted from current lot
    /// quantities matching the count's scope.
    pub expected_quantity: Option<Decimal>,
}

/// variance, variance percentage and the over-tolerance flag.
pub fn variance_fields(expected: Decimal, counted: Decimal) -> (Decimal, Decimal, bool) {
    let variance = counted - expected;
    let percentage = if expected.is_zero() {
        Decimal::ZERO
    } else {
        variance * dec!(100) / expected
    };
    (variance, percentage, variance.abs() > VARIANCE_TOLERANCE)
}

#[derive(Clone)]
pub struct CycleCountService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl CycleCountService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, new))]
    pub async fn create(&self, new: NewCycleCount) -> Result<cycle_count::Model, ServiceError> {
        let count = self
            .db
            .transaction::<_, cycle_count::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let expected = match new.expected_quantity {
                        Some(expected) => expected,
                        None => {
                            let mut query = inventory_lot::Entity::find()
                                .filter(inventory_lot::Column::MaterialId.eq(new.material_id));
                            if let Some(batch) = &new.batch_number {
                                query = query.filter(
                                    inventory_lot::Column::BatchNumber.eq(batch.clone()),
                                );
                            }
                            if let Some(location_id) = new.location_id {
                                query = query.filter(
                                    inventory_lot::Column::LocationId.eq(location_id),
                                );
                            }
                            let lots =
                                query.all(txn).await.map_err(ServiceError::db_error)?;
                            lots.iter().map(|l| l.quantity).sum()
                        }
                    };

                    let count_number =
                        sequences::next_number(txn, sequences::CYCLE_COUNT_PREFIX).await?;
                    let now = Utc::now();
                    cycle_count::ActiveModel {
                        count_number: Set(count_number),
                        material_id: Set(new.material_id),
                        batch_number: Set(new.batch_number),
                        location_id: Set(new.location_id),
                        expected_quantity: Set(expected),
                        has_variance: Set(false),
                        status: Set(CycleCountStatus::Planned.as_str().to_string()),
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

        Ok(count)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<cycle_count::Model, ServiceError> {
        cycle_count::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("cycle count {}", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<CycleCountStatus>,
    ) -> Result<Vec<cycle_count::Model>, ServiceError> {
        let mut query = cycle_count::Entity::find();
        if let Some(status) = status {
            query = query.filter(cycle_count::Column::Status.eq(status.as_str()));
        }
        query
            .order_by_asc(cycle_count::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// PLANNED -> IN_PROGRESS.
    #[instrument(skip(self))]
    pub async fn start(
        &self,
        id: i64,
        performed_by: String,
    ) -> Result<cycle_count::Model, ServiceError> {
        let count = self
            .db
            .transaction::<_, cycle_count::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let count = find_count(txn, id).await?;
                    if CycleCountStatus::from_str(&count.status)
                        != Some(CycleCountStatus::Planned)
                    {
                        return Err(ServiceError::invalid_state(
                            &format!("cycle count {}", count.id),
                            &count.status,
                            CycleCountStatus::Planned.as_str(),
                        ));
                    }

                    let now = Utc::now();
                    let mut active: cycle_count::ActiveModel = count.into();
                    active.status = Set(CycleCountStatus::InProgress.as_str().to_string());
                    active.performed_by = Set(Some(performed_by));
                    active.started_at = Set(Some(now));
                    active.updated_at = Set(now);
                    active.update(txn).await.map_err(ServiceError::db_error)
                })
            })
            .await?;

        Ok(count)
    }

    /// Records (or corrects) the counted quantity, recomputing the variance
    /// fields. Allowed in any non-terminal state.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i64,
        counted_quantity: Decimal,
        notes: Option<String>,
    ) -> Result<cycle_count::Model, ServiceError> {
        if counted_quantity < Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "counted quantity cannot be negative, got {}",
                counted_quantity
            )));
        }

        let count = self
            .db
            .transaction::<_, cycle_count::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let count = find_count(txn, id).await?;
                    if CycleCountStatus::from_str(&count.status)
                        == Some(CycleCountStatus::Completed)
                    {
                        return Err(ServiceError::invalid_state(
                            &format!("cycle count {}", count.id),
                            &count.status,
                            "PLANNED or IN_PROGRESS",
                        ));
                    }

                    let (variance, percentage, has_variance) =
                        variance_fields(count.expected_quantity, counted_quantity);

                    let mut active: cycle_count::ActiveModel = count.into();
                    active.counted_quantity = Set(Some(counted_quantity));
                    active.variance = Set(Some(variance));
                    active.variance_percentage = Set(Some(percentage));
                    active.has_variance = Set(has_variance);
                    if let Some(notes) = notes {
                        active.notes = Set(Some(notes));
                    }
                    active.updated_at = Set(Utc::now());
                    active.update(txn).await.map_err(ServiceError::db_error)
                })
            })
            .await?;

        Ok(count)
    }

    /// IN_PROGRESS -> COMPLETED. Fails `MissingData` if no quantity was ever
    /// counted.
    #[instrument(skip(self))]
    pub async fn complete(&self, id: i64) -> Result<cycle_count::Model, ServiceError> {
        let count = self
            .db
            .transaction::<_, cycle_count::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let count = find_count(txn, id).await?;
                    if CycleCountStatus::from_str(&count.status)
                        != Some(CycleCountStatus::InProgress)
                    {
                        return Err(ServiceError::invalid_state(
                            &format!("cycle count {}", count.id),
                            &count.status,
                            CycleCountStatus::InProgress.as_str(),
                        ));
                    }
                    if count.counted_quantity.is_none() {
                        return Err(ServiceError::MissingData(format!(
                            "cycle count {} has no counted quantity",
                            count.id
                        )));
                    }

                    let now = Utc::now();
                    let mut active: cycle_count::ActiveModel = count.into();
                    active.status = Set(CycleCountStatus::Completed.as_str().to_string());
                    active.completed_at = Set(Some(now));
                    active.updated_at = Set(now);
                    active.update(txn).await.map_err(ServiceError::db_error)
                })
            })
            .await?;

        self.event_sender
            .send(Event::CycleCountCompleted {
                cycle_count_id: count.id,
                variance: count.variance.unwrap_or(Decimal::ZERO),
                has_variance: count.has_variance,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(count)
    }
}

async fn find_count<C: sea_orm::ConnectionTrait>(
    conn: &C,
    id: i64,
) -> Result<cycle_count::Model, ServiceError> {
    cycle_count::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::NotFound(format!("cycle count {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variance_of_97_against_100() {
        let (variance, percentage, has_variance) = variance_fields(dec!(100), dec!(97));
        assert_eq!(variance, dec!(-3));
        assert_eq!(percentage, dec!(-3));
        assert!(has_variance);
    }

    #[test]
    fn exact_count_has_no_variance() {
        let (variance, percentage, has_variance) = variance_fields(dec!(50), dec!(50));
        assert_eq!(variance, Decimal::ZERO);
        assert_eq!(percentage, Decimal::ZERO);
        assert!(!has_variance);
    }

    #[test]
    fn variance_within_tolerance_is_ignored() {
        let (_, _, has_variance) = variance_fields(dec!(100), dec!(100.005));
        assert!(!has_variance);
    }

    #[test]
    fn zero_expected_quantity_yields_zero_percentage() {
        let (variance, percentage, has_variance) = variance_fields(Decimal::ZERO, dec!(4));
        assert_eq!(variance, dec!(4));
        assert_eq!(percentage, Decimal::ZERO);
        assert!(has_variance);
    }
}
