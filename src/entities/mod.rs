pub mod cycle_count;
pub mod inventory_lot;
pub mod issue_reservation;
pub mod material_issue;
pub mod putaway_item;
pub mod sequence_counter;
pub mod stock_movement;
pub mod storage_location;
pub mod temperature_log;
pub mod warehouse;
