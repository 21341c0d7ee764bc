use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_orders_table::Migration),
            Box::new(m20240101_000002_create_food_items_table::Migration),
            Box::new(m20240101_000003_create_order_food_items_table::Migration),
            Box::new(m20240101_000004_create_users_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_orders_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Orders::ClientName).string().not_null())
                        .col(ColumnDef::new(Orders::OrderLocation).string().not_null())
                        .col(ColumnDef::new(Orders::PeopleCount).integer().not_null())
                        .col(ColumnDef::new(Orders::OrderDate).date().not_null())
                        .col(ColumnDef::new(Orders::OrderTime).string().not_null())
                        .col(ColumnDef::new(Orders::OrderOccasion).string().not_null())
                        .col(
                            ColumnDef::new(Orders::OrderStatus)
                                .string()
                                .not_null()
                                .default("D"),
                        )
                        .col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Orders::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            // Dashboard queries filter on date and status
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_order_date")
                        .table(Orders::Table)
                        .col(Orders::OrderDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_order_status")
                        .table(Orders::Table)
                        .col(Orders::OrderStatus)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Orders {
        #[sea_orm(iden = "order_datetime_details")]
        Table,
        Id,
        ClientName,
        OrderLocation,
        PeopleCount,
        OrderDate,
        OrderTime,
        OrderOccasion,
        OrderStatus,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_food_items_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_food_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(FoodItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FoodItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(FoodItems::ItemName).string().not_null())
                        .col(
                            ColumnDef::new(FoodItems::ItemType)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(FoodItems::CutleryType).string().not_null())
                        .col(ColumnDef::new(FoodItems::ServingSpoon).string().not_null())
                        .col(ColumnDef::new(FoodItems::Category).string().not_null())
                        .col(ColumnDef::new(FoodItems::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_food_items_category")
                        .table(FoodItems::Table)
                        .col(FoodItems::Category)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(FoodItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum FoodItems {
        #[sea_orm(iden = "food_item_data")]
        Table,
        Id,
        ItemName,
        ItemType,
        CutleryType,
        ServingSpoon,
        Category,
        CreatedAt,
    }
}

mod m20240101_000003_create_order_food_items_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_order_food_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OrderFoodItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderFoodItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderFoodItems::OrderId).uuid().not_null())
                        .col(
                            ColumnDef::new(OrderFoodItems::FoodItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OrderFoodItems::FoodItemName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OrderFoodItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_food_items_order_id")
                                .from(OrderFoodItems::Table, OrderFoodItems::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_food_items_order_id")
                        .table(OrderFoodItems::Table)
                        .col(OrderFoodItems::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderFoodItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum OrderFoodItems {
        #[sea_orm(iden = "order_food_items")]
        Table,
        Id,
        OrderId,
        FoodItemId,
        FoodItemName,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Orders {
        #[sea_orm(iden = "order_datetime_details")]
        Table,
        Id,
    }
}

mod m20240101_000004_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_users_table"
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
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
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
    enum Users {
        Table,
        Id,
        Email,
        Name,
        PasswordHash,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}
