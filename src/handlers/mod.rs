//! Thin HTTP handlers: validate the DTO, call the service, wrap the result.

pub mod cycle_counts;
pub mod inventory;
pub mod material_issues;
pub mod movements;
pub mod putaway;
pub mod temperature;
pub mod warehouses;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::cycle_counts::CycleCountService;
use crate::services::inventory::InventoryService;
use crate::services::ledger::LedgerService;
use crate::services::material_issues::MaterialIssueService;
use crate::services::putaway::PutawayService;
use crate::services::temperature::TemperatureService;
use crate::services::warehouses::WarehouseService;

/// One instance of every domain service, shared through [`crate::AppState`].
#[derive(Clone)]
pub struct AppServices {
    pub inventory: InventoryService,
    pub ledger: LedgerService,
    pub putaway: PutawayService,
    pub material_issues: MaterialIssueService,
    pub cycle_counts: CycleCountService,
    pub temperature: TemperatureService,
    pub warehouses: WarehouseService,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            inventory: InventoryService::new(db.clone(), event_sender.clone()),
            ledger: LedgerService::new(db.clone()),
            putaway: PutawayService::new(db.clone(), event_sender.clone()),
            material_issues: MaterialIssueService::new(db.clone(), event_sender.clone()),
            cycle_counts: CycleCountService::new(db.clone(), event_sender.clone()),
            temperature: TemperatureService::new(db.clone(), event_sender),
            warehouses: WarehouseService::new(db),
        }
    }
}
