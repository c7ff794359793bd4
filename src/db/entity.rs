//! SeaORM entities. Rust fields are snake_case, columns keep the PascalCase names of the warehouse schema.
pub mod order;
pub mod product;
pub mod product_warehouse;
pub mod warehouse;

pub use order::Entity as Orders;
pub use order::Model as Order;
pub use product::Entity as Products;
pub use product::Model as Product;
pub use product_warehouse::Entity as StockMovements;
pub use product_warehouse::Model as StockMovement;
pub use warehouse::Entity as Warehouses;
pub use warehouse::Model as Warehouse;
