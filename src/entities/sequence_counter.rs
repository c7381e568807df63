use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Monotonic counter per (name, year) scope.
///
/// Replaces read-max-then-increment number generation: the counter row is
/// read with a row lock (on backends that support it) and bumped inside the
/// same transaction as the insert that consumes the number.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sequence_counters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub year: i32,
    pub value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
