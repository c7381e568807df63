use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A request to withdraw a quantity of a material for consumption elsewhere.
///
/// The workflow is strictly PENDING -> APPROVED -> PICKED -> ISSUED; no
/// transition skips a state.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "material_issues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub issue_number: String,
    pub material_id: i64,
    /// Optional batch pin; when set, allocation only considers this batch.
    pub batch_number: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity: rust_decimal::Decimal,
    pub unit: String,
    pub from_location_id: Option<i64>,
    pub to_location_id: Option<i64>,
    pub work_order_id: Option<Uuid>,
    pub batch_id: Option<Uuid>,
    pub reference_id: Option<Uuid>,
    pub status: String,
    pub requested_by: String,
    pub requested_at: DateTime<Utc>,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub picked_by: Option<String>,
    pub picked_at: Option<DateTime<Utc>>,
    pub issued_by: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::issue_reservation::Entity")]
    IssueReservations,
}

impl Related<super::issue_reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IssueReservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueStatus {
    Pending,
    Approved,
    Picked,
    Issued,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Pending => "PENDING",
            IssueStatus::Approved => "APPROVED",
            IssueStatus::Picked => "PICKED",
            IssueStatus::Issued => "ISSUED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(IssueStatus::Pending),
            "APPROVED" => Some(IssueStatus::Approved),
            "PICKED" => Some(IssueStatus::Picked),
            "ISSUED" => Some(IssueStatus::Issued),
            _ => None,
        }
    }
}
