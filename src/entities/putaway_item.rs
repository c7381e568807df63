use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pending placement of a just-received or just-produced quantity.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "putaway_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub putaway_number: String,
    pub material_id: i64,
    pub batch_number: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity: rust_decimal::Decimal,
    pub unit: String,
    pub expiry_date: Option<NaiveDate>,
    pub goods_receipt_item_id: Option<Uuid>,
    pub qa_release_id: Option<Uuid>,
    pub status: String,
    pub location_id: Option<i64>,
    pub zone: Option<String>,
    pub rack: Option<String>,
    pub shelf: Option<String>,
    pub position: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub temperature: Option<rust_decimal::Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub humidity: Option<rust_decimal::Decimal>,
    pub assigned_by: Option<String>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub completed_by: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PutawayStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
}

impl PutawayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PutawayStatus::Pending => "PENDING",
            PutawayStatus::Assigned => "ASSIGNED",
            PutawayStatus::InProgress => "IN_PROGRESS",
            PutawayStatus::Completed => "COMPLETED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(PutawayStatus::Pending),
            "ASSIGNED" => Some(PutawayStatus::Assigned),
            "IN_PROGRESS" => Some(PutawayStatus::InProgress),
            "COMPLETED" => Some(PutawayStatus::Completed),
            _ => None,
        }
    }
}
