//! Schema of the warehouse database.
pub mod order;
pub mod product;
pub mod product_warehouse;
pub mod warehouse;

use sea_orm_migration::prelude::*;

pub struct Migrator;

impl MigratorTrait for Migrator {
    // Referenced tables go first.
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(product::Migration),
            Box::new(warehouse::Migration),
            Box::new(order::Migration),
            Box::new(product_warehouse::Migration),
        ]
    }
}
