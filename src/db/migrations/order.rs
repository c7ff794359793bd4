use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "order_migration"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Order::IdOrder)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Order::IdProduct).integer().not_null())
                    .col(ColumnDef::new(Order::Amount).integer().not_null())
                    .col(ColumnDef::new(Order::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Order::FulfilledAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order-id_product")
                            .from(Order::Table, Order::IdProduct)
                            .to(super::product::Product::Table, super::product::Product::IdProduct),
                    )
                    .to_owned(),
            )
            .await?;

        // Eligible order lookup filters on both columns.
        manager
            .create_index(
                Index::create()
                    .name("idx-order-id_product-fulfilled_at")
                    .table(Order::Table)
                    .col(Order::IdProduct)
                    .col(Order::FulfilledAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Order::Table).to_owned()).await
    }
}

#[derive(Iden)]
pub enum Order {
    #[iden = "Order"]
    Table,
    #[iden = "IdOrder"]
    IdOrder,
    #[iden = "IdProduct"]
    IdProduct,
    #[iden = "Amount"]
    Amount,
    #[iden = "CreatedAt"]
    CreatedAt,
    #[iden = "FulfilledAt"]
    FulfilledAt,
}
