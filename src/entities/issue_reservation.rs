use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Quantity of one lot earmarked for one in-flight material issue.
///
/// Reservations are recorded per (issue, lot) instead of flipping whole lots
/// to RESERVED, so a partially reserved lot keeps its remainder available.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "issue_reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub issue_id: i64,
    pub lot_id: i64,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub reserved_quantity: rust_decimal::Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::material_issue::Entity",
        from = "Column::IssueId",
        to = "super::material_issue::Column::Id"
    )]
    MaterialIssue,
    #[sea_orm(
        belongs_to = "super::inventory_lot::Entity",
        from = "Column::LotId",
        to = "super::inventory_lot::Column::Id"
    )]
    InventoryLot,
}

impl Related<super::material_issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaterialIssue.def()
    }
}

impl Related<super::inventory_lot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryLot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
