//! Stock movement ledger: one row per fulfilled order.
use sea_orm::entity::prelude::*;
use serde::Deserialize;
use serde::Serialize;

use crate::types::Price;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Product_Warehouse")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "IdProductWarehouse")]
    pub id:           i32,
    #[sea_orm(column_name = "IdWarehouse")]
    pub warehouse_id: i32,
    #[sea_orm(column_name = "IdProduct")]
    pub product_id:   i32,
    #[sea_orm(column_name = "IdOrder")]
    pub order_id:     i32,
    #[sea_orm(column_name = "Amount")]
    pub amount:       i32,
    /// Unit price of the product at the moment of fulfillment times `amount`.
    #[sea_orm(column_name = "Price")]
    pub price:        Price,
    #[sea_orm(column_name = "CreatedAt")]
    pub created_at:   DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warehouse::Entity",
        from = "Column::WarehouseId",
        to = "super::warehouse::Column::Id"
    )]
    Warehouse,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
