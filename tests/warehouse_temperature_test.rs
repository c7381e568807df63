mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;

use wms_api::entities::temperature_log::TemperatureStatus;
use wms_api::errors::ServiceError;
use wms_api::events::Event;
use wms_api::services::temperature::NewTemperatureLog;
use wms_api::services::warehouses::NewWarehouse;

#[tokio::test]
async fn duplicate_warehouse_codes_conflict() {
    let app = common::setup().await;
    let services = &app.services;

    common::seed_warehouse(services, "WH1").await;
    let err = services
        .warehouses
        .create_warehouse(NewWarehouse {
            code: "WH1".to_string(),
            name: "Duplicate".to_string(),
            address: None,
            temperature_controlled: false,
            min_temperature: None,
            max_temperature: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn location_codes_are_unique_per_warehouse_only() {
    let app = common::setup().await;
    let services = &app.services;

    let first = common::seed_warehouse(services, "WH1").await;
    let second = common::seed_warehouse(services, "WH2").await;

    common::seed_location(services, first.id, "A-01", None, None).await;

    // same code in the same warehouse conflicts
    let err = services
        .warehouses
        .create_location(wms_api::services::warehouses::NewStorageLocation {
            warehouse_id: first.id,
            code: "A-01".to_string(),
            zone: None,
            rack: None,
            shelf: None,
            position: None,
            capacity: None,
            temperature_controlled: false,
            min_temperature: None,
            max_temperature: None,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));

    // the same code in another warehouse is fine
    common::seed_location(services, second.id, "A-01", None, None).await;
}

#[tokio::test]
async fn readings_are_classified_against_location_thresholds() {
    let mut app = common::setup().await;
    let services = &app.services;

    let warehouse = common::seed_warehouse(services, "WH1").await;
    let location =
        common::seed_location(services, warehouse.id, "COLD-01", Some(dec!(2)), Some(dec!(8)))
            .await;

    let log = services
        .temperature
        .record(NewTemperatureLog {
            location_id: location.id,
            reading: dec!(5),
            min_threshold: None,
            max_threshold: None,
            recorded_by: "sensor-1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(log.status, TemperatureStatus::Normal.as_str());
    assert_eq!(log.min_threshold, dec!(2));
    assert_eq!(log.max_threshold, dec!(8));

    let warning = services
        .temperature
        .record(NewTemperatureLog {
            location_id: location.id,
            reading: dec!(7.9),
            min_threshold: None,
            max_threshold: None,
            recorded_by: "sensor-1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(warning.status, TemperatureStatus::Warning.as_str());

    let out_of_range = services
        .temperature
        .record(NewTemperatureLog {
            location_id: location.id,
            reading: dec!(8.5),
            min_threshold: None,
            max_threshold: None,
            recorded_by: "sensor-1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(out_of_range.status, TemperatureStatus::OutOfRange.as_str());

    // only the out-of-range reading raises an event
    let event = app.events.recv().await.expect("event expected");
    match event {
        Event::TemperatureOutOfRange { log_id, reading, .. } => {
            assert_eq!(log_id, out_of_range.id);
            assert_eq!(reading, dec!(8.5));
        }
        other => panic!("unexpected event: {:?}", other),
    }

    let alerts = services
        .temperature
        .list(Some(location.id), Some(TemperatureStatus::OutOfRange))
        .await
        .unwrap();
    assert_eq!(alerts.len(), 1);
}

#[tokio::test]
async fn recording_without_thresholds_fails_with_missing_data() {
    let app = common::setup().await;
    let services = &app.services;

    let warehouse = common::seed_warehouse(services, "WH1").await;
    let location = common::seed_location(services, warehouse.id, "A-01", None, None).await;

    let err = services
        .temperature
        .record(NewTemperatureLog {
            location_id: location.id,
            reading: dec!(5),
            min_threshold: None,
            max_threshold: None,
            recorded_by: "sensor-1".to_string(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::MissingData(_));

    // explicit thresholds work even when the location has none
    let log = services
        .temperature
        .record(NewTemperatureLog {
            location_id: location.id,
            reading: dec!(5),
            min_threshold: Some(dec!(0)),
            max_threshold: Some(dec!(10)),
            recorded_by: "sensor-1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(log.status, TemperatureStatus::Normal.as_str());
}

#[tokio::test]
async fn deactivated_warehouses_drop_out_of_the_active_list() {
    let app = common::setup().await;
    let services = &app.services;

    let warehouse = common::seed_warehouse(services, "WH1").await;
    common::seed_warehouse(services, "WH2").await;

    services
        .warehouses
        .deactivate_warehouse(warehouse.id)
        .await
        .unwrap();

    let active = services.warehouses.list_warehouses(true).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].code, "WH2");

    let all = services.warehouses.list_warehouses(false).await.unwrap();
    assert_eq!(all.len(), 2);
}
