use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only ledger entry. Rows are never updated or deleted; the ledger
/// service exposes no mutation path and no route does either.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_movements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable, year-scoped sequence: `MOV-<year>-<6-digit-seq>`.
    pub movement_number: String,
    pub movement_type: String,
    pub material_id: i64,
    pub batch_number: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity: rust_decimal::Decimal,
    pub unit: String,
    pub from_location_id: Option<i64>,
    pub to_location_id: Option<i64>,
    /// The business object that caused the movement.
    pub reference_id: Option<Uuid>,
    pub reference_type: Option<String>,
    pub performed_by: String,
    pub performed_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementType {
    Receipt,
    Transfer,
    Consumption,
    Adjustment,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Receipt => "RECEIPT",
            MovementType::Transfer => "TRANSFER",
            MovementType::Consumption => "CONSUMPTION",
            MovementType::Adjustment => "ADJUSTMENT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "RECEIPT" => Some(MovementType::Receipt),
            "TRANSFER" => Some(MovementType::Transfer),
            "CONSUMPTION" => Some(MovementType::Consumption),
            "ADJUSTMENT" => Some(MovementType::Adjustment),
            _ => None,
        }
    }
}

/// Signed contribution of a movement to on-hand stock for its material+batch.
///
/// Quantities are stored as positive magnitudes except ADJUSTMENT, which
/// stores the signed delta directly. TRANSFER relocates stock without
/// changing the total.
pub fn signed_quantity(movement: &Model) -> Decimal {
    match MovementType::from_str(&movement.movement_type) {
        Some(MovementType::Receipt) => movement.quantity,
        Some(MovementType::Consumption) => -movement.quantity,
        Some(MovementType::Adjustment) => movement.quantity,
        Some(MovementType::Transfer) | None => Decimal::ZERO,
    }
}
