#![allow(dead_code)]

use std::sync::Arc;

use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::prelude::*;
use sea_orm::IntoActiveModel;
use sea_orm_migration::MigratorTrait;
use tempfile::TempDir;

use warehouse_fulfillment::db::driver::sqlite::Sqlite;
use warehouse_fulfillment::db::driver::DatabaseDriver;
use warehouse_fulfillment::db::migrations::Migrator;
use warehouse_fulfillment::db::entity::Order;
use warehouse_fulfillment::db::entity::Orders;
use warehouse_fulfillment::db::entity::Product;
use warehouse_fulfillment::db::entity::Products;
use warehouse_fulfillment::db::entity::StockMovement;
use warehouse_fulfillment::db::entity::StockMovements;
use warehouse_fulfillment::db::entity::Warehouse;
use warehouse_fulfillment::db::entity::Warehouses;
use warehouse_fulfillment::types::FulfillmentRequest;
use warehouse_fulfillment::types::Price;
use warehouse_fulfillment::OrderFulfillmentWorkflow;

/// A freshly migrated SQLite database living in a temporary directory for the duration of a test.
pub struct TestDb {
    // Keeps the directory alive.
    _dir:   TempDir,
    pub db: Arc<Sqlite>,
}

impl TestDb {
    pub async fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("warehouse-fulfillment")
            .tempdir()
            .expect("Failed to create temporary directory");
        let db = Sqlite::connect(&dir.path().join("warehouse.db"))
            .await
            .expect("Failed to connect to SQLite");
        db.configure().await.expect("Failed to configure SQLite");
        Migrator::up(&db.connection(), None).await.expect("Migrations failed");

        Self {
            _dir: dir,
            db:   Arc::new(db),
        }
    }

    pub fn conn(&self) -> DatabaseConnection {
        self.db.connection()
    }

    pub fn workflow(&self) -> OrderFulfillmentWorkflow {
        OrderFulfillmentWorkflow::new(self.conn())
    }

    pub async fn add_product(&self, id: i32, price: Decimal) {
        let product = Product {
            id,
            name: format!("Product #{id}"),
            description: "Test product".to_string(),
            price: Price::try_from(price).expect("Invalid test price"),
        };
        Products::insert(product.into_active_model())
            .exec(&self.conn())
            .await
            .expect("Failed to add product");
    }

    pub async fn add_warehouse(&self, id: i32) {
        let warehouse = Warehouse {
            id,
            name: format!("Warehouse #{id}"),
            address: "Nowhere St. 1".to_string(),
        };
        Warehouses::insert(warehouse.into_active_model())
            .exec(&self.conn())
            .await
            .expect("Failed to add warehouse");
    }

    pub async fn add_order(&self, id: i32, product_id: i32, amount: i32, created_at: DateTime<Utc>) {
        let order = Order {
            id,
            product_id,
            amount,
            created_at,
            fulfilled_at: None,
        };
        Orders::insert(order.into_active_model())
            .exec(&self.conn())
            .await
            .expect("Failed to add order");
    }

    pub async fn order(&self, id: i32) -> Order {
        Orders::find_by_id(id)
            .one(&self.conn())
            .await
            .expect("Failed to fetch order")
            .unwrap_or_else(|| panic!("Order {id} not found"))
    }

    pub async fn movements(&self) -> Vec<StockMovement> {
        StockMovements::find()
            .all(&self.conn())
            .await
            .expect("Failed to fetch stock movements")
    }

    /// Product 1 priced at 10.00, warehouse 2, and pending order 5 for 100 units created on day 1.
    pub async fn with_example_data(self) -> Self {
        self.add_product(1, Decimal::new(1000, 2)).await;
        self.add_warehouse(2).await;
        self.add_order(5, 1, 100, day(1)).await;
        self
    }
}

/// Midnight of the given day of January 2024.
pub fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, n, 0, 0, 0).unwrap()
}

pub fn request(id_product: i32, id_warehouse: i32, amount: i32, request_created_at: DateTime<Utc>) -> FulfillmentRequest {
    FulfillmentRequest {
        id_product,
        id_warehouse,
        amount,
        request_created_at,
    }
}
