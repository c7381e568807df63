mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;

use wms_api::entities::cycle_count::CycleCountStatus;
use wms_api::entities::stock_movement::MovementType;
use wms_api::errors::ServiceError;
use wms_api::services::cycle_counts::NewCycleCount;
use wms_api::services::inventory::LotAdjustment;
use wms_api::services::ledger::MovementFilter;

fn count_request(material_id: i64, batch: &str) -> NewCycleCount {
    NewCycleCount {
        material_id,
        batch_number: Some(batch.to_string()),
        location_id: None,
        expected_quantity: None,
    }
}

#[tokio::test]
async fn variance_is_computed_from_the_counted_quantity() {
    let app = common::setup().await;
    let services = &app.services;
    common::seed_lot(services, 1, "B1", dec!(100), None, None).await;

    let count = services.cycle_counts.create(count_request(1, "B1")).await.unwrap();
    assert_eq!(count.status, CycleCountStatus::Planned.as_str());
    assert!(count.count_number.starts_with("CC-"));
    // expected quantity snapshotted from the lot store
    assert_eq!(count.expected_quantity, dec!(100));

    let count = services
        .cycle_counts
        .start(count.id, "counter".into())
        .await
        .unwrap();
    assert_eq!(count.status, CycleCountStatus::InProgress.as_str());

    let count = services
        .cycle_counts
        .update(count.id, dec!(97), None)
        .await
        .unwrap();
    assert_eq!(count.variance, Some(dec!(-3)));
    assert_eq!(count.variance_percentage, Some(dec!(-3)));
    assert!(count.has_variance);

    let count = services.cycle_counts.complete(count.id).await.unwrap();
    assert_eq!(count.status, CycleCountStatus::Completed.as_str());
    assert!(count.completed_at.is_some());
}

#[tokio::test]
async fn completing_without_a_count_fails_with_missing_data() {
    let app = common::setup().await;
    let services = &app.services;

    let count = services
        .cycle_counts
        .create(NewCycleCount {
            material_id: 1,
            batch_number: None,
            location_id: None,
            expected_quantity: Some(dec!(10)),
        })
        .await
        .unwrap();
    services
        .cycle_counts
        .start(count.id, "counter".into())
        .await
        .unwrap();

    let err = services.cycle_counts.complete(count.id).await.unwrap_err();
    assert_matches!(err, ServiceError::MissingData(_));

    // completing from PLANNED is an invalid transition
    let other = services
        .cycle_counts
        .create(NewCycleCount {
            material_id: 2,
            batch_number: None,
            location_id: None,
            expected_quantity: Some(dec!(5)),
        })
        .await
        .unwrap();
    let err = services.cycle_counts.complete(other.id).await.unwrap_err();
    assert_matches!(err, ServiceError::InvalidState(_));
}

#[tokio::test]
async fn updates_are_rejected_after_completion() {
    let app = common::setup().await;
    let services = &app.services;

    let count = services
        .cycle_counts
        .create(NewCycleCount {
            material_id: 1,
            batch_number: None,
            location_id: None,
            expected_quantity: Some(dec!(20)),
        })
        .await
        .unwrap();
    services
        .cycle_counts
        .start(count.id, "counter".into())
        .await
        .unwrap();
    services
        .cycle_counts
        .update(count.id, dec!(20), None)
        .await
        .unwrap();
    services.cycle_counts.complete(count.id).await.unwrap();

    let err = services
        .cycle_counts
        .update(count.id, dec!(19), None)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidState(_));
}

#[tokio::test]
async fn adjustment_corrects_the_lot_and_writes_the_delta() {
    let app = common::setup().await;
    let services = &app.services;
    let lot = common::seed_lot(services, 1, "B1", dec!(100), None, None).await;

    let adjustment = services
        .inventory
        .adjust_lot(lot.id, dec!(97), "counter".into())
        .await
        .unwrap();
    let updated = match adjustment {
        LotAdjustment::Updated(lot) => lot,
        LotAdjustment::Depleted => panic!("lot should survive a partial adjustment"),
    };
    assert_eq!(updated.quantity, dec!(97));

    let (adjustments, total) = services
        .ledger
        .list_movements(
            MovementFilter {
                movement_type: Some(MovementType::Adjustment),
                ..Default::default()
            },
            1,
            50,
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(adjustments[0].quantity, dec!(-3));

    assert_eq!(services.ledger.on_hand(1, "B1").await.unwrap(), dec!(97));
    common::assert_conserved(services, 1, "B1").await;
}

#[tokio::test]
async fn adjusting_to_zero_deletes_the_lot() {
    let app = common::setup().await;
    let services = &app.services;
    let lot = common::seed_lot(services, 1, "B1", dec!(5), None, None).await;

    let adjustment = services
        .inventory
        .adjust_lot(lot.id, dec!(0), "counter".into())
        .await
        .unwrap();
    assert_matches!(adjustment, LotAdjustment::Depleted);

    let err = services.inventory.get_lot(lot.id).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));

    assert_eq!(
        services.ledger.on_hand(1, "B1").await.unwrap(),
        rust_decimal::Decimal::ZERO
    );
    common::assert_conserved(services, 1, "B1").await;
}

#[tokio::test]
async fn negative_adjustment_targets_are_rejected() {
    let app = common::setup().await;
    let services = &app.services;
    let lot = common::seed_lot(services, 1, "B1", dec!(5), None, None).await;

    let err = services
        .inventory
        .adjust_lot(lot.id, dec!(-1), "counter".into())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    let unchanged = services.inventory.get_lot(lot.id).await.unwrap();
    assert_eq!(unchanged.quantity, dec!(5));
}
