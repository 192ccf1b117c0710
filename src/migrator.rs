use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_user_types_table::Migration),
            Box::new(m20240101_000002_create_users_table::Migration),
            Box::new(m20240101_000003_create_inventory_items_table::Migration),
            Box::new(m20240101_000004_create_inventory_item_audit_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_user_types_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_user_types_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(UserTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(UserTypes::Id)
                                .small_integer()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(UserTypes::Name)
                                .string_len(50)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(UserTypes::Description).string_len(255).null())
                        .to_owned(),
                )
                .await?;

            // Reference data, seeded once at provisioning time.
            let seed = Query::insert()
                .into_table(UserTypes::Table)
                .columns([UserTypes::Id, UserTypes::Name, UserTypes::Description])
                .values_panic([1.into(), "Employee".into(), "Standard warehouse employee".into()])
                .values_panic([2.into(), "Manager".into(), "Warehouse manager".into()])
                .values_panic([3.into(), "Admin".into(), "Full administrative privileges".into()])
                .to_owned();
            manager.exec_stmt(seed).await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(UserTypes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum UserTypes {
        Table,
        Id,
        Name,
        Description,
    }
}

mod m20240101_000002_create_users_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_user_types_table::UserTypes;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::Username)
                                .string_len(50)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Users::PasswordHash)
                                .string_len(255)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Users::UserTypeId).small_integer().not_null())
                        .col(ColumnDef::new(Users::LastLoginAt).date_time().null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .date_time()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_users_user_type")
                                .from(Users::Table, Users::UserTypeId)
                                .to(UserTypes::Table, UserTypes::Id)
                                .on_update(ForeignKeyAction::Restrict)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_users_user_type_id")
                        .table(Users::Table)
                        .col(Users::UserTypeId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Users {
        Table,
        Id,
        Username,
        PasswordHash,
        UserTypeId,
        LastLoginAt,
        CreatedAt,
    }
}

mod m20240101_000003_create_inventory_items_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_inventory_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryItems::Id)
                                .integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::Uuid)
                                .char_len(36)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(InventoryItems::Name).string_len(100).not_null())
                        .col(ColumnDef::new(InventoryItems::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(InventoryItems::MaxQuantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::Location)
                                .string_len(100)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::SymbolName)
                                .string_len(100)
                                .not_null()
                                .default("shippingbox"),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::CreatedAt)
                                .date_time()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::UpdatedAt)
                                .date_time()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum InventoryItems {
        Table,
        Id,
        Uuid,
        Name,
        Quantity,
        MaxQuantity,
        Location,
        SymbolName,
        CreatedAt,
        UpdatedAt,
    }
}

// Schema reserved for quantity-change auditing. No handler writes to it yet;
// the table exists so the mobile release can adopt auditing without a
// coordinated migration.
mod m20240101_000004_create_inventory_item_audit_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_user_types_table::UserTypes;
    use super::m20240101_000002_create_users_table::Users;
    use super::m20240101_000003_create_inventory_items_table::InventoryItems;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_inventory_item_audit_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryItemAudit::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryItemAudit::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItemAudit::InventoryItemId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryItemAudit::UserId).integer().not_null())
                        .col(
                            ColumnDef::new(InventoryItemAudit::UserTypeId)
                                .small_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItemAudit::ChangeAmount)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItemAudit::OldQuantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItemAudit::NewQuantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItemAudit::OccurredAt)
                                .date_time()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(ColumnDef::new(InventoryItemAudit::Note).string_len(255).null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_audit_item")
                                .from(
                                    InventoryItemAudit::Table,
                                    InventoryItemAudit::InventoryItemId,
                                )
                                .to(InventoryItems::Table, InventoryItems::Id)
                                .on_update(ForeignKeyAction::Restrict)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_audit_user")
                                .from(InventoryItemAudit::Table, InventoryItemAudit::UserId)
                                .to(Users::Table, Users::Id)
                                .on_update(ForeignKeyAction::Restrict)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_audit_user_type")
                                .from(InventoryItemAudit::Table, InventoryItemAudit::UserTypeId)
                                .to(UserTypes::Table, UserTypes::Id)
                                .on_update(ForeignKeyAction::Restrict)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_audit_item_id")
                        .table(InventoryItemAudit::Table)
                        .col(InventoryItemAudit::InventoryItemId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_audit_occurred_at")
                        .table(InventoryItemAudit::Table)
                        .col(InventoryItemAudit::OccurredAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryItemAudit::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum InventoryItemAudit {
        Table,
        Id,
        InventoryItemId,
        UserId,
        UserTypeId,
        ChangeAmount,
        OldQuantity,
        NewQuantity,
        OccurredAt,
        Note,
    }
}
