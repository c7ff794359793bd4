use sea_orm::entity::prelude::*;
use serde::Deserialize;
use serde::Serialize;

use crate::types::Price;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Product")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "IdProduct")]
    pub id:          i32,
    #[sea_orm(column_name = "Name")]
    pub name:        String,
    #[sea_orm(column_name = "Description")]
    pub description: String,
    /// Unit price.
    #[sea_orm(column_name = "Price")]
    pub price:       Price,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
