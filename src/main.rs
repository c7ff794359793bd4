use warehouse_fulfillment::app::FulfillmentApp;
use warehouse_fulfillment::types::Result;

#[tokio::main]
async fn main() -> Result<()> {
    FulfillmentApp::run().await.inspect_err(|err| {
        err.report_with_backtrace(format!("Application errored out: {err}"));
    })
}
