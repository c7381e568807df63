use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single environmental reading at a storage location, classified against
/// the location's thresholds at write time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "temperature_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub location_id: i64,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub reading: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub min_threshold: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub max_threshold: rust_decimal::Decimal,
    pub status: String,
    pub recorded_by: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureStatus {
    Normal,
    /// Within 5% of either threshold. Informational only; never alters
    /// inventory state.
    Warning,
    OutOfRange,
}

impl TemperatureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureStatus::Normal => "NORMAL",
            TemperatureStatus::Warning => "WARNING",
            TemperatureStatus::OutOfRange => "OUT_OF_RANGE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "NORMAL" => Some(TemperatureStatus::Normal),
            "WARNING" => Some(TemperatureStatus::Warning),
            "OUT_OF_RANGE" => Some(TemperatureStatus::OutOfRange),
            _ => None,
        }
    }
}
