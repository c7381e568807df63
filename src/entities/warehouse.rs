use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "warehouses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique business code, e.g. "WH-MAIN". Duplicates are rejected.
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub temperature_controlled: bool,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub min_temperature: Option<rust_decimal::Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub max_temperature: Option<rust_decimal::Decimal>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::storage_location::Entity")]
    StorageLocations,
}

impl Related<super::storage_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StorageLocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
