use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_assets_table::Migration),
            Box::new(m20240601_000002_create_inventory_unit_tables::Migration),
            Box::new(m20240601_000003_create_asset_request_tables::Migration),
            Box::new(m20240601_000004_create_assigned_assets_table::Migration),
            Box::new(m20240601_000005_create_damage_tables::Migration),
            Box::new(m20240601_000006_create_delete_history_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20240601_000001_create_assets_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000001_create_assets_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Assets::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Assets::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Assets::Name).string().not_null().unique_key())
                        .col(ColumnDef::new(Assets::PreCode).string().not_null())
                        .col(
                            ColumnDef::new(Assets::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Assets::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Assets::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Assets {
        Table,
        Id,
        Name,
        PreCode,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240601_000002_create_inventory_unit_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000002_create_inventory_unit_tables"
        }
    }

    /// The nine unit tables share their assignment columns and differ only
    /// in the spec columns, so they are stamped out from one builder.
    const UNIT_TABLES: &[(&str, &[&str])] = &[
        ("laptops", &["processor", "ram", "storage", "operating_system"]),
        ("desktops", &["processor", "ram", "storage", "operating_system"]),
        (
            "mobiles",
            &["processor", "ram", "storage", "network_type", "sim_type"],
        ),
        (
            "tablets",
            &[
                "processor",
                "ram",
                "storage",
                "network_type",
                "sim_type",
                "sim_support",
            ],
        ),
        ("printers", &["printer_type", "paper_size", "dpi"]),
        ("scanners1", &["scanner_type", "scanner_resolution"]),
        ("scanners2", &["scanner_type", "scanner_resolution"]),
        ("scanners3", &["scanner_type", "scanner_resolution"]),
        ("barcode_scanners", &["scan_type", "technology"]),
    ];

    fn unit_table(name: &str, specs: &[&str]) -> TableCreateStatement {
        let mut stmt = Table::create();
        stmt.table(Alias::new(name))
            .if_not_exists()
            .col(
                ColumnDef::new(Alias::new("id"))
                    .uuid()
                    .primary_key()
                    .not_null(),
            )
            .col(ColumnDef::new(Alias::new("brand")).string().not_null())
            .col(ColumnDef::new(Alias::new("model")).string().null());

        for spec in specs {
            stmt.col(ColumnDef::new(Alias::new(*spec)).string().not_null());
        }

        stmt.col(
            ColumnDef::new(Alias::new("asset_tag"))
                .string()
                .not_null()
                .unique_key(),
        )
        .col(
            ColumnDef::new(Alias::new("is_assigned"))
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(Alias::new("assigned_date"))
                .timestamp_with_time_zone()
                .null(),
        )
        .col(ColumnDef::new(Alias::new("remarks")).string().null())
        .col(ColumnDef::new(Alias::new("asset_id")).uuid().not_null())
        .col(
            ColumnDef::new(Alias::new("created_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Alias::new("updated_at"))
                .timestamp_with_time_zone()
                .null(),
        );

        stmt.to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for (name, specs) in UNIT_TABLES {
                manager.create_table(unit_table(name, specs)).await?;
            }
            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for (name, _) in UNIT_TABLES {
                manager
                    .drop_table(Table::drop().table(Alias::new(*name)).to_owned())
                    .await?;
            }
            Ok(())
        }
    }
}

mod m20240601_000003_create_asset_request_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000003_create_asset_request_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AssetRequests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AssetRequests::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(AssetRequests::UserId).uuid().not_null())
                        .col(ColumnDef::new(AssetRequests::UserEmail).string().not_null())
                        .col(ColumnDef::new(AssetRequests::LocationId).uuid().not_null())
                        .col(
                            ColumnDef::new(AssetRequests::RequestDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AssetRequests::Status)
                                .string()
                                .not_null()
                                .default("pending"),
                        )
                        .col(ColumnDef::new(AssetRequests::Message).text().null())
                        .col(
                            ColumnDef::new(AssetRequests::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AssetRequests::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(AssetRequestItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AssetRequestItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AssetRequestItems::AssetRequestId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(AssetRequestItems::AssetId).uuid().not_null())
                        .col(
                            ColumnDef::new(AssetRequestItems::RequestedQuantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AssetRequestItems::ApprovedQuantity)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(AssetRequestItems::PartialReason)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(AssetRequestItems::Brand).string().null())
                        .col(ColumnDef::new(AssetRequestItems::Processor).string().null())
                        .col(ColumnDef::new(AssetRequestItems::Storage).string().null())
                        .col(ColumnDef::new(AssetRequestItems::Ram).string().null())
                        .col(
                            ColumnDef::new(AssetRequestItems::OperatingSystem)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(AssetRequestItems::NetworkType)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(AssetRequestItems::SimType).string().null())
                        .col(ColumnDef::new(AssetRequestItems::SimSupport).string().null())
                        .col(
                            ColumnDef::new(AssetRequestItems::PrinterType)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(AssetRequestItems::PaperSize).string().null())
                        .col(ColumnDef::new(AssetRequestItems::Dpi).string().null())
                        .col(
                            ColumnDef::new(AssetRequestItems::ScannerType)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(AssetRequestItems::ScannerResolution)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(AssetRequestItems::ScanType).string().null())
                        .col(ColumnDef::new(AssetRequestItems::Technology).string().null())
                        .col(
                            ColumnDef::new(AssetRequestItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AssetRequestItems::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_request_items_request")
                                .from(AssetRequestItems::Table, AssetRequestItems::AssetRequestId)
                                .to(AssetRequests::Table, AssetRequests::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AssetRequestItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(AssetRequests::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum AssetRequests {
        Table,
        Id,
        UserId,
        UserEmail,
        LocationId,
        RequestDate,
        Status,
        Message,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum AssetRequestItems {
        Table,
        Id,
        AssetRequestId,
        AssetId,
        RequestedQuantity,
        ApprovedQuantity,
        PartialReason,
        Brand,
        Processor,
        Storage,
        Ram,
        OperatingSystem,
        NetworkType,
        SimType,
        SimSupport,
        PrinterType,
        PaperSize,
        Dpi,
        ScannerType,
        ScannerResolution,
        ScanType,
        Technology,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240601_000004_create_assigned_assets_table {
    use sea_orm_migration::prelude::*;

    use super::m20240601_000003_create_asset_request_tables::AssetRequestItems;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000004_create_assigned_assets_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AssignedAssets::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AssignedAssets::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AssignedAssets::AssetRequestItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(AssignedAssets::AssetType).string().not_null())
                        .col(
                            ColumnDef::new(AssignedAssets::AssetTypeItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AssignedAssets::Status)
                                .string()
                                .not_null()
                                .default("assigned"),
                        )
                        .col(
                            ColumnDef::new(AssignedAssets::AssignedDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AssignedAssets::ReturnedDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(AssignedAssets::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AssignedAssets::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_assigned_assets_request_item")
                                .from(AssignedAssets::Table, AssignedAssets::AssetRequestItemId)
                                .to(AssetRequestItems::Table, AssetRequestItems::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_assigned_assets_item")
                        .table(AssignedAssets::Table)
                        .col(AssignedAssets::AssetRequestItemId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_assigned_assets_unit")
                        .table(AssignedAssets::Table)
                        .col(AssignedAssets::AssetType)
                        .col(AssignedAssets::AssetTypeItemId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AssignedAssets::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum AssignedAssets {
        Table,
        Id,
        AssetRequestItemId,
        AssetType,
        AssetTypeItemId,
        Status,
        AssignedDate,
        ReturnedDate,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240601_000005_create_damage_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000005_create_damage_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DamagedAssets::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DamagedAssets::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DamagedAssets::AssetType).string().not_null())
                        .col(
                            ColumnDef::new(DamagedAssets::AssetTypeItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DamagedAssets::AssetTag).string().not_null())
                        .col(ColumnDef::new(DamagedAssets::Reason).text().not_null())
                        .col(
                            ColumnDef::new(DamagedAssets::ReportedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DamagedAssets::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DamagedAssets::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RepairHistory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RepairHistory::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RepairHistory::AssetType).string().not_null())
                        .col(ColumnDef::new(RepairHistory::AssetTag).string().not_null())
                        .col(
                            ColumnDef::new(RepairHistory::RepairedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RepairHistory::Remarks).string().not_null())
                        .col(
                            ColumnDef::new(RepairHistory::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RepairHistory::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(DamagedAssets::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum DamagedAssets {
        Table,
        Id,
        AssetType,
        AssetTypeItemId,
        AssetTag,
        Reason,
        ReportedAt,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    pub enum RepairHistory {
        Table,
        Id,
        AssetType,
        AssetTag,
        RepairedAt,
        Remarks,
        CreatedAt,
    }
}

mod m20240601_000006_create_delete_history_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000006_create_delete_history_tables"
        }
    }

    fn history_table<T: Iden + Copy + 'static>(
        table: T,
        cols: (T, T, T, T, T, T, T),
    ) -> TableCreateStatement {
        let (id, name, item_type, deleted_by, reason, deleted_at, created_at) = cols;
        Table::create()
            .table(table)
            .if_not_exists()
            .col(ColumnDef::new(id).uuid().primary_key().not_null())
            .col(ColumnDef::new(name).string().not_null())
            .col(ColumnDef::new(item_type).string().not_null())
            .col(ColumnDef::new(deleted_by).string().not_null())
            .col(ColumnDef::new(reason).text().not_null())
            .col(
                ColumnDef::new(deleted_at)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(created_at)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(history_table(
                    AdminDeleteHistory::Table,
                    (
                        AdminDeleteHistory::Id,
                        AdminDeleteHistory::DeletedItemName,
                        AdminDeleteHistory::ItemType,
                        AdminDeleteHistory::DeletedBy,
                        AdminDeleteHistory::Reason,
                        AdminDeleteHistory::DeletedAt,
                        AdminDeleteHistory::CreatedAt,
                    ),
                ))
                .await?;

            manager
                .create_table(history_table(
                    UserDeleteHistory::Table,
                    (
                        UserDeleteHistory::Id,
                        UserDeleteHistory::DeletedItemName,
                        UserDeleteHistory::ItemType,
                        UserDeleteHistory::DeletedBy,
                        UserDeleteHistory::Reason,
                        UserDeleteHistory::DeletedAt,
                        UserDeleteHistory::CreatedAt,
                    ),
                ))
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AdminDeleteHistory::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(UserDeleteHistory::Table).to_owned())
                .await
        }
    }

    #[derive(Iden, Clone, Copy)]
    pub enum AdminDeleteHistory {
        Table,
        Id,
        DeletedItemName,
        ItemType,
        DeletedBy,
        Reason,
        DeletedAt,
        CreatedAt,
    }

    #[derive(Iden, Clone, Copy)]
    pub enum UserDeleteHistory {
        Table,
        Id,
        DeletedItemName,
        ItemType,
        DeletedBy,
        Reason,
        DeletedAt,
        CreatedAt,
    }
}
