pub mod allocation;
pub mod cycle_counts;
pub mod inventory;
pub mod ledger;
pub mod material_issues;
pub mod putaway;
pub mod sequences;
pub mod temperature;
pub mod warehouses;
