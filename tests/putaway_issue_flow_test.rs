mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;

use wms_api::entities::inventory_lot::LotStatus;
use wms_api::entities::material_issue::IssueStatus;
use wms_api::entities::putaway_item::PutawayStatus;
use wms_api::entities::stock_movement::MovementType;
use wms_api::errors::ServiceError;
use wms_api::services::inventory::InventoryLotFilter;
use wms_api::services::ledger::MovementFilter;
use wms_api::services::material_issues::NewMaterialIssue;
use wms_api::services::putaway::{LocationAssignment, NewPutaway};

fn putaway_request(material_id: i64, batch: &str) -> NewPutaway {
    NewPutaway {
        material_id,
        batch_number: batch.to_string(),
        quantity: dec!(100),
        unit: "kg".to_string(),
        expiry_date: Some("2026-01-01".parse().unwrap()),
        goods_receipt_item_id: Some(uuid::Uuid::new_v4()),
        qa_release_id: None,
    }
}

fn assignment(location_id: i64) -> LocationAssignment {
    LocationAssignment {
        location_id,
        zone: Some("A".to_string()),
        rack: Some("R1".to_string()),
        shelf: None,
        position: None,
        temperature: None,
        humidity: None,
        assigned_by: "assigner".to_string(),
    }
}

#[tokio::test]
async fn putaway_walks_its_state_machine_and_creates_the_lot() {
    let app = common::setup().await;
    let services = &app.services;
    let warehouse = common::seed_warehouse(services, "WH1").await;
    let location = common::seed_location(services, warehouse.id, "A-01", None, None).await;

    let item = services.putaway.create(putaway_request(10, "B1")).await.unwrap();
    assert_eq!(item.status, PutawayStatus::Pending.as_str());
    assert!(item.putaway_number.starts_with("PUT-"));

    // completing before a location is assigned is rejected
    let err = services
        .putaway
        .complete(item.id, "operator".into())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidState(_));

    let item = services
        .putaway
        .assign_location(item.id, assignment(location.id))
        .await
        .unwrap();
    assert_eq!(item.status, PutawayStatus::Assigned.as_str());

    let item = services.putaway.start(item.id).await.unwrap();
    assert_eq!(item.status, PutawayStatus::InProgress.as_str());

    // re-assignment after start is rejected
    let err = services
        .putaway
        .assign_location(item.id, assignment(location.id))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidState(_));

    let (item, lot) = services
        .putaway
        .complete(item.id, "operator".into())
        .await
        .unwrap();
    assert_eq!(item.status, PutawayStatus::Completed.as_str());
    assert_eq!(lot.quantity, dec!(100));
    assert_eq!(lot.status, LotStatus::Available.as_str());
    assert_eq!(lot.location_id, Some(location.id));

    // exactly one RECEIPT movement for the received quantity
    let (receipts, total) = services
        .ledger
        .list_movements(
            MovementFilter {
                movement_type: Some(MovementType::Receipt),
                ..Default::default()
            },
            1,
            50,
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(receipts[0].quantity, dec!(100));
    assert!(receipts[0].movement_number.starts_with("MOV-"));

    // completing twice is rejected
    let err = services
        .putaway
        .complete(item.id, "operator".into())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidState(_));

    common::assert_conserved(services, 10, "B1").await;
}

#[tokio::test]
async fn received_stock_flows_through_issue_to_consumption() {
    let app = common::setup().await;
    let services = &app.services;
    let warehouse = common::seed_warehouse(services, "WH1").await;
    let location = common::seed_location(services, warehouse.id, "A-01", None, None).await;

    let item = services.putaway.create(putaway_request(10, "B1")).await.unwrap();
    services
        .putaway
        .assign_location(item.id, assignment(location.id))
        .await
        .unwrap();
    let (_, lot) = services
        .putaway
        .complete(item.id, "operator".into())
        .await
        .unwrap();

    let issue = services
        .material_issues
        .create(NewMaterialIssue {
            material_id: 10,
            batch_number: Some("B1".to_string()),
            quantity: dec!(60),
            unit: "kg".to_string(),
            from_location_id: Some(location.id),
            to_location_id: None,
            work_order_id: Some(uuid::Uuid::new_v4()),
            batch_id: None,
            reference_id: None,
            requested_by: "requester".to_string(),
        })
        .await
        .unwrap();
    assert!(issue.issue_number.starts_with("ISS-"));

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

    // partial reservation leaves the remainder available
    let reserved = services.inventory.get_lot(lot.id).await.unwrap();
    assert_eq!(reserved.status, LotStatus::Available.as_str());
    assert_eq!(reserved.quantity, dec!(100));
    let reservations = services.material_issues.reservations(issue.id).await.unwrap();
    assert_eq!(reservations.len(), 1);
    assert_eq!(reservations[0].reserved_quantity, dec!(60));

    services
        .material_issues
        .issue(issue.id, "issuer".into())
        .await
        .unwrap();

    let remaining = services.inventory.get_lot(lot.id).await.unwrap();
    assert_eq!(remaining.quantity, dec!(40));
    assert_eq!(remaining.status, LotStatus::Available.as_str());

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
    assert_eq!(total, 1);
    assert_eq!(consumptions[0].quantity, dec!(60));

    assert_eq!(services.ledger.on_hand(10, "B1").await.unwrap(), dec!(40));
    common::assert_conserved(services, 10, "B1").await;
}

#[tokio::test]
async fn issue_transitions_cannot_skip_states() {
    let app = common::setup().await;
    let services = &app.services;
    common::seed_lot(services, 10, "B1", dec!(100), None, None).await;

    let issue = services
        .material_issues
        .create(NewMaterialIssue {
            material_id: 10,
            batch_number: None,
            quantity: dec!(10),
            unit: "kg".to_string(),
            from_location_id: None,
            to_location_id: None,
            work_order_id: None,
            batch_id: None,
            reference_id: None,
            requested_by: "requester".to_string(),
        })
        .await
        .unwrap();

    // PENDING -> issue() must fail and the issue must stay PENDING
    let err = services
        .material_issues
        .issue(issue.id, "issuer".into())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidState(msg) if msg.contains("PENDING") && msg.contains("PICKED"));
    let issue_after = services.material_issues.get(issue.id).await.unwrap();
    assert_eq!(issue_after.status, IssueStatus::Pending.as_str());

    // PENDING -> pick() must fail too
    let err = services
        .material_issues
        .pick(issue.id, "picker".into())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidState(_));

    // approving twice must fail
    services
        .material_issues
        .approve(issue.id, "approver".into())
        .await
        .unwrap();
    let err = services
        .material_issues
        .approve(issue.id, "approver".into())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidState(_));
}

#[tokio::test]
async fn list_inventory_is_stable_between_reads() {
    let app = common::setup().await;
    let services = &app.services;

    common::seed_lot(services, 1, "B1", dec!(5), Some("2025-06-01"), None).await;
    common::seed_lot(services, 1, "B1", dec!(5), Some("2025-01-01"), None).await;
    common::seed_lot(services, 1, "B1", dec!(5), None, None).await;

    let filter = InventoryLotFilter {
        material_id: Some(1),
        ..Default::default()
    };
    let first = services.inventory.list_lots(filter.clone()).await.unwrap();
    let second = services.inventory.list_lots(filter).await.unwrap();
    assert_eq!(first, second);

    // FEFO order: earliest expiry first, no expiry last
    let expiries: Vec<_> = first.iter().map(|l| l.expiry_date).collect();
    assert_eq!(
        expiries,
        vec![
            Some("2025-01-01".parse().unwrap()),
            Some("2025-06-01".parse().unwrap()),
            None
        ]
    );
}
