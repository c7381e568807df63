//! FEFO allocation engine.
//!
//! Planning is a pure function over candidate lots; the reservation and
//! consumption phases apply a plan against the database and are always called
//! from inside the workflow transaction that owns the state transition.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::inventory_lot::{self, LotStatus};
use crate::entities::issue_reservation;
use crate::entities::material_issue;
use crate::entities::stock_movement::{self, MovementType};
use crate::errors::ServiceError;
use crate::services::ledger::{self, NewMovement};

/// One line of an allocation plan: take `quantity` from lot `lot_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotAllocation {
    pub lot_id: i64,
    pub quantity: Decimal,
}

/// A lot as the planner sees it: its unreserved quantity and expiry.
#[derive(Debug, Clone)]
pub struct CandidateLot {
    pub lot_id: i64,
    pub available: Decimal,
    pub expiry_date: Option<NaiveDate>,
}

/// Everything the consumption phase touched, for post-commit event emission.
pub struct ConsumptionOutcome {
    pub movements: Vec<stock_movement::Model>,
    pub depleted_lots: Vec<inventory_lot::Model>,
}

/// FEFO ordering: earliest expiry first, lots without an expiry last, ties
/// broken by id (creation order).
pub fn compare_fefo(
    a_expiry: Option<NaiveDate>,
    a_id: i64,
    b_expiry: Option<NaiveDate>,
    b_id: i64,
) -> Ordering {
    match (a_expiry, b_expiry) {
        (Some(a), Some(b)) => a.cmp(&b).then(a_id.cmp(&b_id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a_id.cmp(&b_id),
    }
}

/// Builds an allocation plan covering `requested` exactly, or fails with
/// `InsufficientInventory` naming the total available quantity. Never
/// produces a partial plan.
pub fn plan_fefo(
    mut candidates: Vec<CandidateLot>,
    requested: Decimal,
) -> Result<Vec<LotAllocation>, ServiceError> {
    if requested <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(format!(
            "requested quantity must be positive, got {}",
            requested
        )));
    }

    candidates.retain(|c| c.available > Decimal::ZERO);
    candidates.sort_by(|a, b| compare_fefo(a.expiry_date, a.lot_id, b.expiry_date, b.lot_id));

    let available: Decimal = candidates.iter().map(|c| c.available).sum();
    if available < requested {
        return Err(ServiceError::insufficient_inventory(requested, available));
    }

    let mut plan = Vec::new();
    let mut remaining = requested;
    for candidate in &candidates {
        if remaining.is_zero() {
            break;
        }
        let take = candidate.available.min(remaining);
        plan.push(LotAllocation {
            lot_id: candidate.lot_id,
            quantity: take,
        });
        remaining -= take;
    }

    Ok(plan)
}

/// PICK phase: plans against AVAILABLE lots net of existing reservations and
/// writes one reservation row per plan line. A lot flips to RESERVED only
/// once reservations cover its full quantity, so a partially reserved lot
/// keeps its remainder allocatable.
pub async fn reserve_for_issue<C: ConnectionTrait>(
    txn: &C,
    issue: &material_issue::Model,
) -> Result<Vec<issue_reservation::Model>, ServiceError> {
    let mut query = inventory_lot::Entity::find()
        .filter(inventory_lot::Column::MaterialId.eq(issue.material_id))
        .filter(inventory_lot::Column::Status.eq(LotStatus::Available.as_str()));
    if let Some(batch) = &issue.batch_number {
        query = query.filter(inventory_lot::Column::BatchNumber.eq(batch.clone()));
    }
    if txn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }
    let lots = query.all(txn).await.map_err(ServiceError::db_error)?;

    let lot_ids: Vec<i64> = lots.iter().map(|l| l.id).collect();
    let mut reserved_by_lot: HashMap<i64, Decimal> = HashMap::new();
    if !lot_ids.is_empty() {
        let existing = issue_reservation::Entity::find()
            .filter(issue_reservation::Column::LotId.is_in(lot_ids))
            .all(txn)
            .await
            .map_err(ServiceError::db_error)?;
        for r in existing {
            *reserved_by_lot.entry(r.lot_id).or_insert(Decimal::ZERO) += r.reserved_quantity;
        }
    }

    let candidates = lots
        .iter()
        .map(|lot| CandidateLot {
            lot_id: lot.id,
            available: lot.quantity
                - reserved_by_lot.get(&lot.id).copied().unwrap_or(Decimal::ZERO),
            expiry_date: lot.expiry_date,
        })
        .collect();

    let plan = plan_fefo(candidates, issue.quantity)?;

    let now = Utc::now();
    let mut created = Vec::with_capacity(plan.len());
    for line in plan {
        let reservation = issue_reservation::ActiveModel {
            issue_id: Set(issue.id),
            lot_id: Set(line.lot_id),
            reserved_quantity: Set(line.quantity),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(ServiceError::db_error)?;

        let lot = lots
            .iter()
            .find(|l| l.id == line.lot_id)
            .ok_or_else(|| ServiceError::NotFound(format!("inventory lot {}", line.lot_id)))?;
        let total_reserved = reserved_by_lot
            .get(&lot.id)
            .copied()
            .unwrap_or(Decimal::ZERO)
            + line.quantity;
        if total_reserved >= lot.quantity {
            let mut active: inventory_lot::ActiveModel = lot.clone().into();
            active.status = Set(LotStatus::Reserved.as_str().to_string());
            active.updated_at = Set(now);
            active.update(txn).await.map_err(ServiceError::db_error)?;
        }

        created.push(reservation);
    }

    Ok(created)
}

/// ISSUE phase: consumes the reservations recorded at PICK. Each touched lot
/// loses its reserved quantity and gets one CONSUMPTION movement; lots driven
/// to zero are deleted, survivors return to AVAILABLE. Reservation rows are
/// removed as they are consumed.
pub async fn consume_reserved<C: ConnectionTrait>(
    txn: &C,
    issue: &material_issue::Model,
    performed_by: &str,
) -> Result<ConsumptionOutcome, ServiceError> {
    let reservations = issue_reservation::Entity::find()
        .filter(issue_reservation::Column::IssueId.eq(issue.id))
        .order_by_asc(issue_reservation::Column::Id)
        .all(txn)
        .await
        .map_err(ServiceError::db_error)?;
    if reservations.is_empty() {
        return Err(ServiceError::MissingData(format!(
            "material issue {} has no reservations to consume",
            issue.id
        )));
    }

    let mut movements = Vec::with_capacity(reservations.len());
    let mut depleted_lots = Vec::new();

    for reservation in reservations {
        let mut query = inventory_lot::Entity::find_by_id(reservation.lot_id);
        if txn.get_database_backend() == DbBackend::Postgres {
            query = query.lock_exclusive();
        }
        let lot = query
            .one(txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("inventory lot {}", reservation.lot_id))
            })?;

        let remaining = lot.quantity - reservation.reserved_quantity;
        if remaining < Decimal::ZERO {
            return Err(ServiceError::insufficient_inventory(
                reservation.reserved_quantity,
                lot.quantity,
            ));
        }

        let movement = ledger::record_movement(
            txn,
            NewMovement {
                movement_type: MovementType::Consumption,
                material_id: lot.material_id,
                batch_number: lot.batch_number.clone(),
                quantity: reservation.reserved_quantity,
                unit: lot.unit.clone(),
                from_location_id: lot.location_id,
                to_location_id: issue.to_location_id,
                reference_id: issue.work_order_id.or(issue.batch_id).or(issue.reference_id),
                reference_type: Some("MATERIAL_ISSUE".to_string()),
                performed_by: performed_by.to_string(),
            },
        )
        .await?;
        movements.push(movement);

        if remaining.is_zero() {
            inventory_lot::Entity::delete_by_id(lot.id)
                .exec(txn)
                .await
                .map_err(ServiceError::db_error)?;
            depleted_lots.push(lot);
        } else {
            let mut active: inventory_lot::ActiveModel = lot.into();
            active.quantity = Set(remaining);
            active.status = Set(LotStatus::Available.as_str().to_string());
            active.updated_at = Set(Utc::now());
            active.update(txn).await.map_err(ServiceError::db_error)?;
        }

        issue_reservation::Entity::delete_by_id(reservation.id)
            .exec(txn)
            .await
            .map_err(ServiceError::db_error)?;
    }

    Ok(ConsumptionOutcome {
        movements,
        depleted_lots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn candidate(lot_id: i64, available: Decimal, expiry: Option<&str>) -> CandidateLot {
        CandidateLot {
            lot_id,
            available,
            expiry_date: expiry.map(|d| d.parse().unwrap()),
        }
    }

    #[test]
    fn takes_earliest_expiry_first_and_splits_the_second_lot() {
        let plan = plan_fefo(
            vec![
                candidate(3, dec!(5), None),
                candidate(1, dec!(5), Some("2025-01-01")),
                candidate(2, dec!(5), Some("2025-06-01")),
            ],
            dec!(7),
        )
        .unwrap();

        assert_eq!(
            plan,
            vec![
                LotAllocation { lot_id: 1, quantity: dec!(5) },
                LotAllocation { lot_id: 2, quantity: dec!(2) },
            ]
        );
    }

    #[test]
    fn lots_without_expiry_are_used_last() {
        let plan = plan_fefo(
            vec![
                candidate(1, dec!(4), None),
                candidate(2, dec!(4), Some("2030-12-31")),
            ],
            dec!(6),
        )
        .unwrap();

        assert_eq!(plan[0].lot_id, 2);
        assert_eq!(plan[1].lot_id, 1);
        assert_eq!(plan[1].quantity, dec!(2));
    }

    #[test]
    fn expiry_ties_break_by_creation_order() {
        let plan = plan_fefo(
            vec![
                candidate(9, dec!(3), Some("2025-03-01")),
                candidate(4, dec!(3), Some("2025-03-01")),
            ],
            dec!(4),
        )
        .unwrap();

        assert_eq!(plan[0].lot_id, 4);
        assert_eq!(plan[1].lot_id, 9);
    }

    #[test]
    fn insufficient_stock_reports_requested_and_available() {
        let err = plan_fefo(vec![candidate(1, dec!(3), None)], dec!(10)).unwrap_err();
        match err {
            ServiceError::InsufficientInventory(msg) => {
                assert!(msg.contains("10"));
                assert!(msg.contains('3'));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn fully_reserved_lots_contribute_nothing() {
        let err = plan_fefo(
            vec![
                candidate(1, dec!(0), Some("2025-01-01")),
                candidate(2, dec!(2), Some("2025-06-01")),
            ],
            dec!(3),
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::InsufficientInventory(_)));
    }

    #[test]
    fn zero_request_is_rejected() {
        let err = plan_fefo(vec![candidate(1, dec!(5), None)], dec!(0)).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }
}
