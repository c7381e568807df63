use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A scheduled or ad-hoc reconciliation of expected vs counted quantity.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cycle_counts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub count_number: String,
    pub material_id: i64,
    pub batch_number: Option<String>,
    pub location_id: Option<i64>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub expected_quantity: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub counted_quantity: Option<rust_decimal::Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub variance: Option<rust_decimal::Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub variance_percentage: Option<rust_decimal::Decimal>,
    pub has_variance: bool,
    pub status: String,
    pub performed_by: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleCountStatus {
    Planned,
    InProgress,
    Completed,
}

impl CycleCountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleCountStatus::Planned => "PLANNED",
            CycleCountStatus::InProgress => "IN_PROGRESS",
            CycleCountStatus::Completed => "COMPLETED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PLANNED" => Some(CycleCountStatus::Planned),
            "IN_PROGRESS" => Some(CycleCountStatus::InProgress),
            "COMPLETED" => Some(CycleCountStatus::Completed),
            _ => None,
        }
    }
}
