use sea_orm::entity::prelude::*;
use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Warehouse")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "IdWarehouse")]
    pub id:      i32,
    #[sea_orm(column_name = "Name")]
    pub name:    String,
    #[sea_orm(column_name = "Address")]
    pub address: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
