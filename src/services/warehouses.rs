//! Warehouse and storage-location registry.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::instrument;

use crate::db::DbPool;
use crate::entities::{storage_location, warehouse};
use crate::errors::ServiceError;

#[derive(Debug, Clone)]
pub struct NewWarehouse {
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub temperature_controlled: bool,
    pub min_temperature: Option<Decimal>,
    pub max_temperature: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct NewStorageLocation {
    pub warehouse_id: i64,
    pub code: String,
    pub zone: Option<String>,
    pub rack: Option<String>,
    pub shelf: Option<String>,
    pub position: Option<String>,
    pub capacity: Option<Decimal>,
    pub temperature_controlled: bool,
    pub min_temperature: Option<Decimal>,
    pub max_temperature: Option<Decimal>,
}

#[derive(Clone)]
pub struct WarehouseService {
    db: Arc<DbPool>,
}

impl WarehouseService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, new))]
    pub async fn create_warehouse(
        &self,
        new: NewWarehouse,
    ) -> Result<warehouse::Model, ServiceError> {
        let existing = warehouse::Entity::find()
            .filter(warehouse::Column::Code.eq(new.code.clone()))
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "warehouse code {} already exists",
                new.code
            )));
        }

        let now = Utc::now();
        warehouse::ActiveModel {
            code: Set(new.code),
            name: Set(new.name),
            address: Set(new.address),
            temperature_controlled: Set(new.temperature_controlled),
            min_temperature: Set(new.min_temperature),
            max_temperature: Set(new.max_temperature),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get_warehouse(&self, id: i64) -> Result<warehouse::Model, ServiceError> {
        warehouse::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("warehouse {}", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_warehouses(
        &self,
        active_only: bool,
    ) -> Result<Vec<warehouse::Model>, ServiceError> {
        let mut query = warehouse::Entity::find();
        if active_only {
            query = query.filter(warehouse::Column::Active.eq(true));
        }
        query
            .order_by_asc(warehouse::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Deactivates a warehouse; reference data is never deleted.
    #[instrument(skip(self))]
    pub async fn deactivate_warehouse(&self, id: i64) -> Result<warehouse::Model, ServiceError> {
        let existing = self.get_warehouse(id).await?;
        let mut active: warehouse::ActiveModel = existing.into();
        active.active = Set(false);
        active.updated_at = Set(Utc::now());
        active
            .update(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self, new))]
    pub async fn create_location(
        &self,
        new: NewStorageLocation,
    ) -> Result<storage_location::Model, ServiceError> {
        self.get_warehouse(new.warehouse_id).await?;

        let existing = storage_location::Entity::find()
            .filter(storage_location::Column::WarehouseId.eq(new.warehouse_id))
            .filter(storage_location::Column::Code.eq(new.code.clone()))
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "location code {} already exists in warehouse {}",
                new.code, new.warehouse_id
            )));
        }

        let now = Utc::now();
        storage_location::ActiveModel {
            warehouse_id: Set(new.warehouse_id),
            code: Set(new.code),
            zone: Set(new.zone),
            rack: Set(new.rack),
            shelf: Set(new.shelf),
            position: Set(new.position),
            capacity: Set(new.capacity),
            temperature_controlled: Set(new.temperature_controlled),
            min_temperature: Set(new.min_temperature),
            max_temperature: Set(new.max_temperature),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get_location(&self, id: i64) -> Result<storage_location::Model, ServiceError> {
        storage_location::Entity::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("storage location {}", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_locations(
        &self,
        warehouse_id: Option<i64>,
    ) -> Result<Vec<storage_location::Model>, ServiceError> {
        let mut query = storage_location::Entity::find();
        if let Some(warehouse_id) = warehouse_id {
            query = query.filter(storage_location::Column::WarehouseId.eq(warehouse_id));
        }
        query
            .order_by_asc(storage_location::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }
}
