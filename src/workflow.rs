//! Order fulfillment.
//!
//! A fulfillment request is served by four steps executed within a single database transaction:
//!
//! 1. the product and the warehouse must exist;
//! 2. a pending order for the product must exist which covers the requested amount and was created no later than the
//!    request timestamp; when several qualify, the one with the smallest ID wins;
//! 3. the order gets its `FulfilledAt` set to the current time;
//! 4. a stock movement is recorded with its price computed as the product unit price times the requested amount.
//!
//! The price is computed before anything is written; a price that doesn't fit fails validation.
//!
//! Either all of it is committed, or none. Every step takes the transaction handle explicitly and reports failures
//! via [`Result`]; [`OrderFulfillmentWorkflow::fulfill`] is the only place where the transaction is committed or
//! rolled back.

use chrono::DateTime;
use chrono::Utc;
use garde::Validate;
use sea_orm::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::NotSet;
use sea_orm::ActiveValue::Set;
use sea_orm::DatabaseTransaction;
use sea_orm::DbBackend;
use sea_orm::QueryOrder;
use sea_orm::QuerySelect;
use sea_orm::TransactionTrait;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::instrument;
use tracing::warn;

use crate::db::entity::order;
use crate::db::entity::product_warehouse;
use crate::db::entity::Order;
use crate::db::entity::Orders;
use crate::db::entity::Product;
use crate::db::entity::Products;
use crate::db::entity::StockMovements;
use crate::db::entity::Warehouses;
use crate::types::FulfillmentError;
use crate::types::FulfillmentReceipt;
use crate::types::Price;
use crate::types::FulfillmentRequest;
use crate::types::Result;

#[derive(Debug, Clone)]
pub struct OrderFulfillmentWorkflow {
    db: DatabaseConnection,
}

impl OrderFulfillmentWorkflow {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Make sure the database is still reachable.
    pub async fn ping(&self) -> Result<()> {
        Ok(self.db.ping().await?)
    }

    #[instrument(
        level = "debug",
        skip(self, request),
        fields(product = request.id_product, warehouse = request.id_warehouse, amount = request.amount)
    )]
    pub async fn fulfill(&self, request: &FulfillmentRequest) -> Result<FulfillmentReceipt> {
        request
            .validate()
            .map_err(|report| FulfillmentError::validation(report.to_string().trim_end()))?;

        let txn = self.db.begin().await?;

        match fulfill_within(&txn, request).await {
            Ok(receipt) => {
                txn.commit().await?;
                info!(
                    "Order for product {} fulfilled into warehouse {}, stock movement {}",
                    request.id_product, request.id_warehouse, receipt.id_product_warehouse
                );
                Ok(receipt)
            }
            Err(err) => {
                if err.is_validation() {
                    debug!("Fulfillment rejected: {err}");
                }
                else {
                    warn!("Fulfillment failed, rolling back: {err}");
                }
                // A rollback failure is only logged; the caller gets the fulfillment error.
                if let Err(rb_err) = txn.rollback().await {
                    error!("Rollback failed: {rb_err}");
                }
                Err(err)
            }
        }
    }
}

async fn fulfill_within(txn: &DatabaseTransaction, request: &FulfillmentRequest) -> Result<FulfillmentReceipt> {
    let product = check_existence(txn, request.id_product, request.id_warehouse).await?;
    let order = find_eligible_order(txn, request).await?;
    let price = product
        .price
        .checked_mul(request.amount)
        .ok_or_else(|| FulfillmentError::validation("price overflow"))?;

    let now = Utc::now();
    mark_fulfilled(txn, order.id, now).await?;
    let id_product_warehouse = record_movement(txn, request, price, order.id, now).await?;

    Ok(FulfillmentReceipt { id_product_warehouse })
}

/// Both lookups are always performed, the outcome is their conjunction.
async fn check_existence(txn: &DatabaseTransaction, id_product: i32, id_warehouse: i32) -> Result<Product> {
    let product = Products::find_by_id(id_product).one(txn).await?;
    let warehouse_found = Warehouses::find_by_id(id_warehouse).count(txn).await? > 0;

    debug!(
        "Product {id_product} found: {}, warehouse {id_warehouse} found: {warehouse_found}",
        product.is_some()
    );

    match product {
        Some(product) if warehouse_found => Ok(product),
        _ => Err(FulfillmentError::validation("invalid product or warehouse")),
    }
}

async fn find_eligible_order(txn: &DatabaseTransaction, request: &FulfillmentRequest) -> Result<Order> {
    let mut select = Orders::find()
        .filter(order::Column::ProductId.eq(request.id_product))
        .filter(order::Column::Amount.gte(request.amount))
        .filter(order::Column::CreatedAt.lte(request.request_created_at))
        .filter(order::Column::FulfilledAt.is_null())
        .order_by_asc(order::Column::Id);

    // SQLite has no row locks; its writers are serialized and mark_fulfilled catches a lost race.
    if txn.get_database_backend() != DbBackend::Sqlite {
        select = select.lock_exclusive();
    }

    let order = select
        .one(txn)
        .await?
        .ok_or_else(|| FulfillmentError::validation("no valid order"))?;

    debug!("Selected order {} (amount {}, created {})", order.id, order.amount, order.created_at);

    Ok(order)
}

async fn mark_fulfilled(txn: &DatabaseTransaction, order_id: i32, now: DateTime<Utc>) -> Result<()> {
    let res = Orders::update_many()
        .col_expr(order::Column::FulfilledAt, Expr::value(now))
        .filter(order::Column::Id.eq(order_id))
        .filter(order::Column::FulfilledAt.is_null())
        .exec(txn)
        .await?;

    if res.rows_affected != 1 {
        return Err(FulfillmentError::Conflict(order_id));
    }

    Ok(())
}

async fn record_movement(
    txn: &DatabaseTransaction,
    request: &FulfillmentRequest,
    price: Price,
    order_id: i32,
    now: DateTime<Utc>,
) -> Result<i32> {
    let movement = product_warehouse::ActiveModel {
        id:           NotSet,
        warehouse_id: Set(request.id_warehouse),
        product_id:   Set(request.id_product),
        order_id:     Set(order_id),
        amount:       Set(request.amount),
        price:        Set(price),
        created_at:   Set(now),
    };

    let inserted = StockMovements::insert(movement).exec(txn).await?;

    Ok(inserted.last_insert_id)
}
