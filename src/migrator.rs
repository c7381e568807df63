use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_warehouse_tables::Migration),
            Box::new(m20240101_000002_create_inventory_tables::Migration),
            Box::new(m20240101_000003_create_putaway_table::Migration),
            Box::new(m20240101_000004_create_material_issue_tables::Migration),
            Box::new(m20240101_000005_create_monitoring_tables::Migration),
        ]
    }
}

mod m20240101_000001_create_warehouse_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_warehouse_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Warehouses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Warehouses::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Warehouses::Code).string().not_null())
                        .col(ColumnDef::new(Warehouses::Name).string().not_null())
                        .col(ColumnDef::new(Warehouses::Address).string().null())
                        .col(
                            ColumnDef::new(Warehouses::TemperatureControlled)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Warehouses::MinTemperature)
                                .decimal_len(16, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Warehouses::MaxTemperature)
                                .decimal_len(16, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Warehouses::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Warehouses::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Warehouses::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_warehouses_code")
                        .table(Warehouses::Table)
                        .col(Warehouses::Code)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StorageLocations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StorageLocations::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StorageLocations::WarehouseId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StorageLocations::Code).string().not_null())
                        .col(ColumnDef::new(StorageLocations::Zone).string().null())
                        .col(ColumnDef::new(StorageLocations::Rack).string().null())
                        .col(ColumnDef::new(StorageLocations::Shelf).string().null())
                        .col(ColumnDef::new(StorageLocations::Position).string().null())
                        .col(
                            ColumnDef::new(StorageLocations::Capacity)
                                .decimal_len(16, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StorageLocations::TemperatureControlled)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(StorageLocations::MinTemperature)
                                .decimal_len(16, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StorageLocations::MaxTemperature)
                                .decimal_len(16, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StorageLocations::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(StorageLocations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StorageLocations::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_storage_locations_warehouse")
                                .from(StorageLocations::Table, StorageLocations::WarehouseId)
                                .to(Warehouses::Table, Warehouses::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_storage_locations_warehouse_code")
                        .table(StorageLocations::Table)
                        .col(StorageLocations::WarehouseId)
                        .col(StorageLocations::Code)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StorageLocations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Warehouses::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Warehouses {
        Table,
        Id,
        Code,
        Name,
        Address,
        TemperatureControlled,
        MinTemperature,
        MaxTemperature,
        Active,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum StorageLocations {
        Table,
        Id,
        WarehouseId,
        Code,
        Zone,
        Rack,
        Shelf,
        Position,
        Capacity,
        TemperatureControlled,
        MinTemperature,
        MaxTemperature,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_inventory_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_inventory_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryLots::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryLots::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryLots::MaterialId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryLots::BatchNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryLots::Quantity)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryLots::Unit).string().not_null())
                        .col(
                            ColumnDef::new(InventoryLots::LocationId)
                                .big_integer()
                                .null(),
                        )
                        .col(ColumnDef::new(InventoryLots::Zone).string().null())
                        .col(ColumnDef::new(InventoryLots::Rack).string().null())
                        .col(ColumnDef::new(InventoryLots::Shelf).string().null())
                        .col(ColumnDef::new(InventoryLots::Position).string().null())
                        .col(ColumnDef::new(InventoryLots::Status).string().not_null())
                        .col(ColumnDef::new(InventoryLots::ExpiryDate).date().null())
                        .col(
                            ColumnDef::new(InventoryLots::Temperature)
                                .decimal_len(16, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InventoryLots::Humidity)
                                .decimal_len(16, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(InventoryLots::GoodsReceiptItemId)
                                .uuid()
                                .null(),
                        )
                        .col(ColumnDef::new(InventoryLots::QaReleaseId).uuid().null())
                        .col(
                            ColumnDef::new(InventoryLots::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryLots::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_inventory_lots_material_batch")
                        .table(InventoryLots::Table)
                        .col(InventoryLots::MaterialId)
                        .col(InventoryLots::BatchNumber)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_inventory_lots_status")
                        .table(InventoryLots::Table)
                        .col(InventoryLots::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StockMovements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockMovements::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::MovementNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::MovementType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::MaterialId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::BatchNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::Quantity)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockMovements::Unit).string().not_null())
                        .col(
                            ColumnDef::new(StockMovements::FromLocationId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::ToLocationId)
                                .big_integer()
                                .null(),
                        )
                        .col(ColumnDef::new(StockMovements::ReferenceId).uuid().null())
                        .col(
                            ColumnDef::new(StockMovements::ReferenceType)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::PerformedBy)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::PerformedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_stock_movements_number")
                        .table(StockMovements::Table)
                        .col(StockMovements::MovementNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_stock_movements_material_batch")
                        .table(StockMovements::Table)
                        .col(StockMovements::MaterialId)
                        .col(StockMovements::BatchNumber)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SequenceCounters::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(SequenceCounters::Name).string().not_null())
                        .col(ColumnDef::new(SequenceCounters::Year).integer().not_null())
                        .col(
                            ColumnDef::new(SequenceCounters::Value)
                                .big_integer()
                                .not_null(),
                        )
                        .primary_key(
                            Index::create()
                                .col(SequenceCounters::Name)
                                .col(SequenceCounters::Year),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SequenceCounters::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(StockMovements::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(InventoryLots::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum InventoryLots {
        Table,
        Id,
        MaterialId,
        BatchNumber,
        Quantity,
        Unit,
        LocationId,
        Zone,
        Rack,
        Shelf,
        Position,
        Status,
        ExpiryDate,
        Temperature,
        Humidity,
        GoodsReceiptItemId,
        QaReleaseId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum StockMovements {
        Table,
        Id,
        MovementNumber,
        MovementType,
        MaterialId,
        BatchNumber,
        Quantity,
        Unit,
        FromLocationId,
        ToLocationId,
        ReferenceId,
        ReferenceType,
        PerformedBy,
        PerformedAt,
    }

    #[derive(Iden)]
    enum SequenceCounters {
        Table,
        Name,
        Year,
        Value,
    }
}

mod m20240101_000003_create_putaway_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_putaway_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PutawayItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PutawayItems::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PutawayItems::PutawayNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PutawayItems::MaterialId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PutawayItems::BatchNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PutawayItems::Quantity)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(PutawayItems::Unit).string().not_null())
                        .col(ColumnDef::new(PutawayItems::ExpiryDate).date().null())
                        .col(
                            ColumnDef::new(PutawayItems::GoodsReceiptItemId)
                                .uuid()
                                .null(),
                        )
                        .col(ColumnDef::new(PutawayItems::QaReleaseId).uuid().null())
                        .col(ColumnDef::new(PutawayItems::Status).string().not_null())
                        .col(ColumnDef::new(PutawayItems::LocationId).big_integer().null())
                        .col(ColumnDef::new(PutawayItems::Zone).string().null())
                        .col(ColumnDef::new(PutawayItems::Rack).string().null())
                        .col(ColumnDef::new(PutawayItems::Shelf).string().null())
                        .col(ColumnDef::new(PutawayItems::Position).string().null())
                        .col(
                            ColumnDef::new(PutawayItems::Temperature)
                                .decimal_len(16, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PutawayItems::Humidity)
                                .decimal_len(16, 4)
                                .null(),
                        )
                        .col(ColumnDef::new(PutawayItems::AssignedBy).string().null())
                        .col(
                            ColumnDef::new(PutawayItems::AssignedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(PutawayItems::CompletedBy).string().null())
                        .col(
                            ColumnDef::new(PutawayItems::CompletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PutawayItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PutawayItems::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_putaway_items_number")
                        .table(PutawayItems::Table)
                        .col(PutawayItems::PutawayNumber)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PutawayItems::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum PutawayItems {
        Table,
        Id,
        PutawayNumber,
        MaterialId,
        BatchNumber,
        Quantity,
        Unit,
        ExpiryDate,
        GoodsReceiptItemId,
        QaReleaseId,
        Status,
        LocationId,
        Zone,
        Rack,
        Shelf,
        Position,
        Temperature,
        Humidity,
        AssignedBy,
        AssignedAt,
        CompletedBy,
        CompletedAt,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_material_issue_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_material_issue_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MaterialIssues::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MaterialIssues::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialIssues::IssueNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialIssues::MaterialId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MaterialIssues::BatchNumber).string().null())
                        .col(
                            ColumnDef::new(MaterialIssues::Quantity)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(MaterialIssues::Unit).string().not_null())
                        .col(
                            ColumnDef::new(MaterialIssues::FromLocationId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaterialIssues::ToLocationId)
                                .big_integer()
                                .null(),
                        )
                        .col(ColumnDef::new(MaterialIssues::WorkOrderId).uuid().null())
                        .col(ColumnDef::new(MaterialIssues::BatchId).uuid().null())
                        .col(ColumnDef::new(MaterialIssues::ReferenceId).uuid().null())
                        .col(ColumnDef::new(MaterialIssues::Status).string().not_null())
                        .col(
                            ColumnDef::new(MaterialIssues::RequestedBy)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialIssues::RequestedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MaterialIssues::ApprovedBy).string().null())
                        .col(
                            ColumnDef::new(MaterialIssues::ApprovedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(MaterialIssues::PickedBy).string().null())
                        .col(
                            ColumnDef::new(MaterialIssues::PickedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(MaterialIssues::IssuedBy).string().null())
                        .col(
                            ColumnDef::new(MaterialIssues::IssuedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaterialIssues::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialIssues::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_material_issues_number")
                        .table(MaterialIssues::Table)
                        .col(MaterialIssues::IssueNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(IssueReservations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(IssueReservations::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(IssueReservations::IssueId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(IssueReservations::LotId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(IssueReservations::ReservedQuantity)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(IssueReservations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_issue_reservations_issue")
                                .from(IssueReservations::Table, IssueReservations::IssueId)
                                .to(MaterialIssues::Table, MaterialIssues::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_issue_reservations_issue")
                        .table(IssueReservations::Table)
                        .col(IssueReservations::IssueId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_issue_reservations_lot")
                        .table(IssueReservations::Table)
                        .col(IssueReservations::LotId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(IssueReservations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MaterialIssues::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum MaterialIssues {
        Table,
        Id,
        IssueNumber,
        MaterialId,
        BatchNumber,
        Quantity,
        Unit,
        FromLocationId,
        ToLocationId,
        WorkOrderId,
        BatchId,
        ReferenceId,
        Status,
        RequestedBy,
        RequestedAt,
        ApprovedBy,
        ApprovedAt,
        PickedBy,
        PickedAt,
        IssuedBy,
        IssuedAt,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum IssueReservations {
        Table,
        Id,
        IssueId,
        LotId,
        ReservedQuantity,
        CreatedAt,
    }
}

mod m20240101_000005_create_monitoring_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_monitoring_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CycleCounts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CycleCounts::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CycleCounts::CountNumber).string().not_null())
                        .col(
                            ColumnDef::new(CycleCounts::MaterialId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CycleCounts::BatchNumber).string().null())
                        .col(ColumnDef::new(CycleCounts::LocationId).big_integer().null())
                        .col(
                            ColumnDef::new(CycleCounts::ExpectedQuantity)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CycleCounts::CountedQuantity)
                                .decimal_len(16, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(CycleCounts::Variance)
                                .decimal_len(16, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(CycleCounts::VariancePercentage)
                                .decimal_len(16, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(CycleCounts::HasVariance)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(CycleCounts::Status).string().not_null())
                        .col(ColumnDef::new(CycleCounts::PerformedBy).string().null())
                        .col(
                            ColumnDef::new(CycleCounts::StartedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(CycleCounts::CompletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(CycleCounts::Notes).string().null())
                        .col(
                            ColumnDef::new(CycleCounts::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CycleCounts::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_cycle_counts_number")
                        .table(CycleCounts::Table)
                        .col(CycleCounts::CountNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TemperatureLogs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TemperatureLogs::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TemperatureLogs::LocationId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TemperatureLogs::Reading)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TemperatureLogs::MinThreshold)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TemperatureLogs::MaxThreshold)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(TemperatureLogs::Status).string().not_null())
                        .col(
                            ColumnDef::new(TemperatureLogs::RecordedBy)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TemperatureLogs::RecordedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TemperatureLogs::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(CycleCounts::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum CycleCounts {
        Table,
        Id,
        CountNumber,
        MaterialId,
        BatchNumber,
        LocationId,
        ExpectedQuantity,
        CountedQuantity,
        Variance,
        VariancePercentage,
        HasVariance,
        Status,
        PerformedBy,
        StartedAt,
        CompletedAt,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum TemperatureLogs {
        Table,
        Id,
        LocationId,
        Reading,
        MinThreshold,
        MaxThreshold,
        Status,
        RecordedBy,
        RecordedAt,
    }
}
