use sea_orm::entity::prelude::*;
use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Order")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "IdOrder")]
    pub id:           i32,
    #[sea_orm(column_name = "IdProduct")]
    pub product_id:   i32,
    /// Requested quantity.
    #[sea_orm(column_name = "Amount")]
    pub amount:       i32,
    #[sea_orm(column_name = "CreatedAt")]
    pub created_at:   DateTimeUtc,
    // NULL while the order is pending.
    #[sea_orm(column_name = "FulfilledAt")]
    pub fulfilled_at: Option<DateTimeUtc>,
}

impl Model {
    pub fn is_pending(&self) -> bool {
        self.fulfilled_at.is_none()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
