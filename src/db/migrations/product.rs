use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "product_migration"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Product::IdProduct)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Product::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Product::Description).string_len(200).not_null())
                    // Hundredths of the currency unit.
                    .col(ColumnDef::new(Product::Price).big_integer().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(Iden)]
pub enum Product {
    #[iden = "Product"]
    Table,
    #[iden = "IdProduct"]
    IdProduct,
    #[iden = "Name"]
    Name,
    #[iden = "Description"]
    Description,
    #[iden = "Price"]
    Price,
}
