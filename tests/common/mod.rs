#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::mpsc;

use wms_api::db::{self, DbConfig, DbPool};
use wms_api::entities::{inventory_lot, storage_location, warehouse};
use wms_api::events::{Event, EventSender};
use wms_api::handlers::AppServices;
use wms_api::services::inventory::NewInventoryLot;
use wms_api::services::warehouses::{NewStorageLocation, NewWarehouse};

pub struct TestApp {
    pub services: AppServices,
    pub pool: Arc<DbPool>,
    /// Held open so event sends never fail mid-test.
    pub events: mpsc::Receiver<Event>,
}

/// Fresh in-memory database with migrations applied. The pool is limited to
/// one connection so every query sees the same sqlite memory instance.
pub async fn setup() -> TestApp {
    let config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let pool = db::establish_connection_with_config(&config)
        .await
        .expect("database should connect");
    db::run_migrations(&pool)
        .await
        .expect("migrations should apply");
    let pool = Arc::new(pool);

    let (tx, rx) = mpsc::channel(64);
    let services = AppServices::new(pool.clone(), EventSender::new(tx));

    TestApp {
        services,
        pool,
        events: rx,
    }
}

pub async fn seed_warehouse(services: &AppServices, code: &str) -> warehouse::Model {
    services
        .warehouses
        .create_warehouse(NewWarehouse {
            code: code.to_string(),
            name: format!("Warehouse {}", code),
            address: None,
            temperature_controlled: false,
            min_temperature: None,
            max_temperature: None,
        })
        .await
        .expect("warehouse should be created")
}

pub async fn seed_location(
    services: &AppServices,
    warehouse_id: i64,
    code: &str,
    min_temperature: Option<Decimal>,
    max_temperature: Option<Decimal>,
) -> storage_location::Model {
    services
        .warehouses
        .create_location(NewStorageLocation {
            warehouse_id,
            code: code.to_string(),
            zone: Some("A".to_string()),
            rack: None,
            shelf: None,
            position: None,
            capacity: None,
            temperature_controlled: min_temperature.is_some(),
            min_temperature,
            max_temperature,
        })
        .await
        .expect("location should be created")
}

pub async fn seed_lot(
    services: &AppServices,
    material_id: i64,
    batch_number: &str,
    quantity: Decimal,
    expiry_date: Option<&str>,
    location_id: Option<i64>,
) -> inventory_lot::Model {
    services
        .inventory
        .create_lot(NewInventoryLot {
            material_id,
            batch_number: batch_number.to_string(),
            quantity,
            unit: "kg".to_string(),
            location_id,
            zone: None,
            rack: None,
            shelf: None,
            position: None,
            expiry_date: expiry_date.map(|d| d.parse().expect("valid date")),
            temperature: None,
            humidity: None,
            goods_receipt_item_id: None,
            qa_release_id: None,
            created_by: "tester".to_string(),
        })
        .await
        .expect("lot should be created")
}

/// Conservation check: the signed movement sum must equal the lot sum for
/// the material+batch.
pub async fn assert_conserved(services: &AppServices, material_id: i64, batch_number: &str) {
    use wms_api::services::inventory::InventoryLotFilter;

    let on_hand = services
        .ledger
        .on_hand(material_id, batch_number)
        .await
        .expect("on-hand query should succeed");
    let lots = services
        .inventory
        .list_lots(InventoryLotFilter {
            material_id: Some(material_id),
            batch_number: Some(batch_number.to_string()),
            ..Default::default()
        })
        .await
        .expect("lot query should succeed");
    let lot_sum: Decimal = lots.iter().map(|l| l.quantity).sum();

    assert_eq!(
        on_hand, lot_sum,
        "ledger and lots disagree for material {} batch {}",
        material_id, batch_number
    );
}
