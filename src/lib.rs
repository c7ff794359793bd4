//! # warehouse-fulfillment
//!
//! A service with a single purpose: fulfill a pending warehouse order and record the resulting stock movement.
//!
//! ```text
//! POST /AddProductToWarehouse
//! { "IdProduct": 1, "IdWarehouse": 2, "Amount": 50, "RequestCreatedAt": "2024-01-02T00:00:00" }
//!
//! 200 OK
//! { "IdProductWarehouse": 17 }
//! ```
//!
//! The heart of it is [`OrderFulfillmentWorkflow`]. It validates the request against the database, picks the oldest
//! (by ID) pending order that covers the requested amount, marks it fulfilled, and inserts a `Product_Warehouse` row
//! priced at the product's current unit price times the amount. All of that happens in one transaction: it either
//! commits as a whole or leaves no trace.
//!
//! Concurrent attempts to fulfill the same order are resolved by the database. Where row locks are available the
//! order lookup takes one; in any case the update only touches an order that is still pending, and a request that
//! loses the race gets [`FulfillmentError::Conflict`] and is rolled back.
//!
//! # Running
//!
//! ```text
//! warehouse-fulfillment --sqlite --sqlite-path warehouse.db --migrate --listen 127.0.0.1:8080
//! ```
//!
//! Every option can also be set via a `WAREHOUSE_*` environment variable. See `--help`. Backends are enabled by the
//! `sqlite` and `pg` cargo features.

pub mod app;
pub mod db;
pub mod http;
pub mod types;
pub mod workflow;

#[doc(inline)]
pub use types::FulfillmentError;
#[doc(inline)]
pub use workflow::OrderFulfillmentWorkflow;

pub mod prelude {
    pub use crate::db::driver::DatabaseDriver;
    pub use crate::types::*;
    pub use crate::workflow::OrderFulfillmentWorkflow;
}
