use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "warehouse_migration"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Warehouse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Warehouse::IdWarehouse)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Warehouse::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Warehouse::Address).string_len(200).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Warehouse::Table).to_owned()).await
    }
}

#[derive(Iden)]
pub enum Warehouse {
    #[iden = "Warehouse"]
    Table,
    #[iden = "IdWarehouse"]
    IdWarehouse,
    #[iden = "Name"]
    Name,
    #[iden = "Address"]
    Address,
}
