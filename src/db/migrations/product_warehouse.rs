use sea_orm_migration::prelude::*;

use super::order::Order;
use super::product::Product;
use super::warehouse::Warehouse;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "product_warehouse_migration"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductWarehouse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductWarehouse::IdProductWarehouse)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductWarehouse::IdWarehouse).integer().not_null())
                    .col(ColumnDef::new(ProductWarehouse::IdProduct).integer().not_null())
                    .col(ColumnDef::new(ProductWarehouse::IdOrder).integer().not_null())
                    .col(ColumnDef::new(ProductWarehouse::Amount).integer().not_null())
                    .col(ColumnDef::new(ProductWarehouse::Price).big_integer().not_null())
                    .col(
                        ColumnDef::new(ProductWarehouse::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-product_warehouse-id_warehouse")
                            .from(ProductWarehouse::Table, ProductWarehouse::IdWarehouse)
                            .to(Warehouse::Table, Warehouse::IdWarehouse),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-product_warehouse-id_product")
                            .from(ProductWarehouse::Table, ProductWarehouse::IdProduct)
                            .to(Product::Table, Product::IdProduct),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-product_warehouse-id_order")
                            .from(ProductWarehouse::Table, ProductWarehouse::IdOrder)
                            .to(Order::Table, Order::IdOrder),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductWarehouse::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProductWarehouse {
    #[iden = "Product_Warehouse"]
    Table,
    #[iden = "IdProductWarehouse"]
    IdProductWarehouse,
    #[iden = "IdWarehouse"]
    IdWarehouse,
    #[iden = "IdProduct"]
    IdProduct,
    #[iden = "IdOrder"]
    IdOrder,
    #[iden = "Amount"]
    Amount,
    #[iden = "Price"]
    Price,
    #[iden = "CreatedAt"]
    CreatedAt,
}
