//! HTTP surface of the service.
//!
//! ## Routes
//!
//! - `POST /AddProductToWarehouse` — fulfill an order. Responds with `200 {"IdProductWarehouse": <id>}` or with `400`
//!   and a plain-text explanation.
//! - `GET /health` — `200 {"ok": true}` if the database responds, `503` otherwise.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::debug;
use tracing::info;
use tracing::instrument;
use tracing::warn;

use crate::types::FulfillmentError;
use crate::types::FulfillmentRequest;
use crate::types::Result;
use crate::workflow::OrderFulfillmentWorkflow;

/// Every failure a client can cause or observe is reported as `400 Bad Request`.
impl IntoResponse for FulfillmentError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

pub fn router(workflow: Arc<OrderFulfillmentWorkflow>) -> Router {
    Router::new()
        .route("/AddProductToWarehouse", post(add_product_to_warehouse))
        .route("/health", get(health))
        .with_state(workflow)
}

/// Serve until Ctrl-C is received.
pub async fn serve(workflow: Arc<OrderFulfillmentWorkflow>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(workflow))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Can't listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl-C, shutting down");
}

#[instrument(level = "debug", skip_all)]
async fn add_product_to_warehouse(
    State(workflow): State<Arc<OrderFulfillmentWorkflow>>,
    payload: std::result::Result<Json<FulfillmentRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Malformed request: {rejection}");
            return (StatusCode::BAD_REQUEST, rejection.body_text()).into_response();
        }
    };

    match workflow.fulfill(&request).await {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn health(State(workflow): State<Arc<OrderFulfillmentWorkflow>>) -> Response {
    match workflow.ping().await {
        Ok(()) => Json(json!({ "ok": true })).into_response(),
        Err(err) => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()).into_response(),
    }
}
