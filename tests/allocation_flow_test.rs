mod common;

use assert_matches::assert_matches;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use wms_api::entities::inventory_lot::LotStatus;
use wms_api::entities::material_issue::IssueStatus;
use wms_api::entities::stock_movement::MovementType;
use wms_api::errors::ServiceError;
use wms_api::services::ledger::MovementFilter;
use wms_api::services::material_issues::NewMaterialIssue;

fn issue_request(material_id: i64, quantity: Decimal) -> NewMaterialIssue {
    NewMaterialIssue {
        material_id,
        batch_number: None,
        quantity,
        unit: "kg".to_string(),
        from_location_id: None,
        to_location_id: None,
        work_order_id: None,
        batch_id: None,
        reference_id: None,
        requested_by: "requester".to_string(),
    }
}

#[tokio::test]
async fn pick_reserves_earliest_expiring_lots_first() {
    let app = common::setup().await;
    let services = &app.services;

    let lot_jan = common::seed_lot(services, 1, "B1", dec!(5), Some("2025-01-01"), None).await;
    let lot_jun = common::seed_lot(services, 1, "B1", dec!(5), Some("2025-06-01"), None).await;
    let lot_open = common::seed_lot(services, 1, "B1", dec!(5), None, None).await;

    let issue = services
        .material_issues
        .create(issue_request(1, dec!(7)))
        .await
        .unwrap();
    services
        .material_issues
        .approve(issue.id, "approver".into())
        .await
        .unwrap();
    let picked = services
        .material_issues
        .pick(issue.id, "picker".into())
        .await
        .unwrap();
    assert_eq!(picked.status, IssueStatus::Picked.as_str());

    let reservations = services.material_issues.reservations(issue.id).await.unwrap();
    assert_eq!(reservations.len(), 2);
    assert_eq!(reservations[0].lot_id, lot_jan.id);
    assert_eq!(reservations[0].reserved_quantity, dec!(5));
    assert_eq!(reservations[1].lot_id, lot_jun.id);
    assert_eq!(reservations[1].reserved_quantity, dec!(2));

    // the fully covered lot flips to RESERVED; the split lot keeps its
    // remainder available; the no-expiry lot is untouched
    let lot_jan = services.inventory.get_lot(lot_jan.id).await.unwrap();
    assert_eq!(lot_jan.status, LotStatus::Reserved.as_str());
    assert_eq!(lot_jan.quantity, dec!(5));
    let lot_jun = services.inventory.get_lot(lot_jun.id).await.unwrap();
    assert_eq!(lot_jun.status, LotStatus::Available.as_str());
    assert_eq!(lot_jun.quantity, dec!(5));
    let lot_open = services.inventory.get_lot(lot_open.id).await.unwrap();
    assert_eq!(lot_open.status, LotStatus::Available.as_str());
}

#[tokio::test]
async fn issue_consumes_reservations_and_deletes_empty_lots() {
    let app = common::setup().await;
    let services = &app.services;

    let lot_jan = common::seed_lot(services, 1, "B1", dec!(5), Some("2025-01-01"), None).await;
    let lot_jun = common::seed_lot(services, 1, "B1", dec!(5), Some("2025-06-01"), None).await;

    let issue = services
        .material_issues
        .create(issue_request(1, dec!(7)))
        .await
        .unwrap();
    services
        .material_issues
        .approve(issue.id, "approver".into())
        .await
        .unwrap();
    services
        .material_issues
        .pick(issue.id, "picker".into())
        .await
        .unwrap();
    let issued = services
        .material_issues
        .issue(issue.id, "issuer".into())
        .await
        .unwrap();
    assert_eq!(issued.status, IssueStatus::Issued.as_str());

    let err = services.inventory.get_lot(lot_jan.id).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
    let survivor = services.inventory.get_lot(lot_jun.id).await.unwrap();
    assert_eq!(survivor.quantity, dec!(3));
    assert_eq!(survivor.status, LotStatus::Available.as_str());

    let (consumptions, total) = services
        .ledger
        .list_movements(
            MovementFilter {
                movement_type: Some(MovementType::Consumption),
                ..Default::default()
            },
            1,
            50,
        )
        .await
        .unwrap();
    assert_eq!(total, 2);
    let consumed: Decimal = consumptions.iter().map(|m| m.quantity).sum();
    assert_eq!(consumed, dec!(7));

    assert!(services
        .material_issues
        .reservations(issue.id)
        .await
        .unwrap()
        .is_empty());

    assert_eq!(services.ledger.on_hand(1, "B1").await.unwrap(), dec!(3));
    common::assert_conserved(services, 1, "B1").await;
}

#[tokio::test]
async fn failed_pick_rolls_back_and_leaves_lots_untouched() {
    let app = common::setup().await;
    let services = &app.services;

    let lot = common::seed_lot(services, 1, "B1", dec!(5), Some("2025-01-01"), None).await;

    let issue = services
        .material_issues
        .create(issue_request(1, dec!(100)))
        .await
        .unwrap();
    services
        .material_issues
        .approve(issue.id, "approver".into())
        .await
        .unwrap();

    let err = services
        .material_issues
        .pick(issue.id, "picker".into())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientInventory(_));

    let issue = services.material_issues.get(issue.id).await.unwrap();
    assert_eq!(issue.status, IssueStatus::Approved.as_str());
    assert!(services
        .material_issues
        .reservations(issue.id)
        .await
        .unwrap()
        .is_empty());

    let lot = services.inventory.get_lot(lot.id).await.unwrap();
    assert_eq!(lot.quantity, dec!(5));
    assert_eq!(lot.status, LotStatus::Available.as_str());
}

#[tokio::test]
async fn two_issues_cannot_reserve_the_same_quantity() {
    let app = common::setup().await;
    let services = &app.services;

    common::seed_lot(services, 1, "B1", dec!(10), None, None).await;

    let first = services
        .material_issues
        .create(issue_request(1, dec!(6)))
        .await
        .unwrap();
    services
        .material_issues
        .approve(first.id, "approver".into())
        .await
        .unwrap();
    services
        .material_issues
        .pick(first.id, "picker".into())
        .await
        .unwrap();

    // 4 units remain unreserved; a second issue for 6 must fail
    let second = services
        .material_issues
        .create(issue_request(1, dec!(6)))
        .await
        .unwrap();
    services
        .material_issues
        .approve(second.id, "approver".into())
        .await
        .unwrap();
    let err = services
        .material_issues
        .pick(second.id, "picker".into())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientInventory(_));

    // but a second issue within the remainder succeeds
    let third = services
        .material_issues
        .create(issue_request(1, dec!(4)))
        .await
        .unwrap();
    services
        .material_issues
        .approve(third.id, "approver".into())
        .await
        .unwrap();
    services
        .material_issues
        .pick(third.id, "picker".into())
        .await
        .unwrap();
}

#[tokio::test]
async fn batch_pinned_issue_ignores_other_batches() {
    let app = common::setup().await;
    let services = &app.services;

    common::seed_lot(services, 1, "B1", dec!(5), Some("2025-01-01"), None).await;
    common::seed_lot(services, 1, "B2", dec!(50), Some("2024-01-01"), None).await;

    let mut request = issue_request(1, dec!(8));
    request.batch_number = Some("B1".to_string());
    let issue = services.material_issues.create(request).await.unwrap();
    services
        .material_issues
        .approve(issue.id, "approver".into())
        .await
        .unwrap();

    let err = services
        .material_issues
        .pick(issue.id, "picker".into())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientInventory(_));
}

#[tokio::test]
async fn no_lot_quantity_ever_goes_negative() {
    let app = common::setup().await;
    let services = &app.services;

    common::seed_lot(services, 1, "B1", dec!(3), None, None).await;

    for requested in [dec!(1), dec!(1), dec!(1), dec!(1)] {
        let issue = services
            .material_issues
            .create(issue_request(1, requested))
            .await
            .unwrap();
        services
            .material_issues
            .approve(issue.id, "approver".into())
            .await
            .unwrap();
        let picked = services.material_issues.pick(issue.id, "picker".into()).await;
        match picked {
            Ok(_) => {
                services
                    .material_issues
                    .issue(issue.id, "issuer".into())
                    .await
                    .unwrap();
            }
            Err(err) => assert_matches!(err, ServiceError::InsufficientInventory(_)),
        }
    }

    use wms_api::services::inventory::InventoryLotFilter;
    let lots = services
        .inventory
        .list_lots(InventoryLotFilter::default())
        .await
        .unwrap();
    assert!(lots.iter().all(|l| l.quantity > Decimal::ZERO));
    common::assert_conserved(services, 1, "B1").await;
}
