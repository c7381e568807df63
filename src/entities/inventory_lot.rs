use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical quantity of one material, one batch, at one location.
///
/// A lot's quantity is strictly positive while the row exists; consumption
/// that drives it to zero deletes the row instead of leaving a zero balance.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_lots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub material_id: i64,
    pub batch_number: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity: rust_decimal::Decimal,
    pub unit: String,
    pub location_id: Option<i64>,
    pub zone: Option<String>,
    pub rack: Option<String>,
    pub shelf: Option<String>,
    pub position: Option<String>,
    pub status: String,
    pub expiry_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub temperature: Option<rust_decimal::Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub humidity: Option<rust_decimal::Decimal>,
    /// Provenance: the goods-receipt line or QA release that produced this lot.
    pub goods_receipt_item_id: Option<Uuid>,
    pub qa_release_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::storage_location::Entity",
        from = "Column::LocationId",
        to = "super::storage_location::Column::Id"
    )]
    StorageLocation,
    #[sea_orm(has_many = "super::issue_reservation::Entity")]
    IssueReservations,
}

impl Related<super::storage_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StorageLocation.def()
    }
}

impl Related<super::issue_reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IssueReservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LotStatus {
    Available,
    Reserved,
    Quarantined,
}

impl LotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotStatus::Available => "AVAILABLE",
            LotStatus::Reserved => "RESERVED",
            LotStatus::Quarantined => "QUARANTINED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "AVAILABLE" => Some(LotStatus::Available),
            "RESERVED" => Some(LotStatus::Reserved),
            "QUARANTINED" => Some(LotStatus::Quarantined),
            _ => None,
        }
    }
}
