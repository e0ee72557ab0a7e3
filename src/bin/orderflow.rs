//! Runs the fulfillment and intake services in one process.
//!
//! The intake service reaches fulfillment over loopback gRPC; both exchanges
//! are in-memory and keep at most `BROKER_RETENTION` messages each.

use std::sync::Arc;

use orderflow::bus::{BestEffort, InMemoryQueue, Publisher, Subscribable};
use orderflow::config::Config;
use orderflow::fulfillment::{self, FulfillmentState};
use orderflow::intake::{self, GrpcFulfillmentClient, OrderIntake};
use orderflow::microsvc;
use orderflow::store::{InMemoryInventory, InMemoryOrderStore};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    init_tracing(&config.log_level);

    info!(
        intake = %config.intake.http_addr,
        fulfillment_http = %config.fulfillment.http_addr,
        fulfillment_grpc = %config.fulfillment.grpc_addr,
        inventory_mode = %config.intake.inventory_mode,
        "starting orderflow"
    );

    let crm_exchange = InMemoryQueue::bounded(config.broker.crm_exchange.clone(), config.broker.retention);
    let storefront_exchange =
        InMemoryQueue::bounded(config.broker.ecommerce_exchange.clone(), config.broker.retention);

    // Fulfillment
    let storefront_publisher: Arc<dyn Publisher> = Arc::new(storefront_exchange.clone());
    let fulfillment_service = Arc::new(fulfillment::service(FulfillmentState::seeded(
        BestEffort::new(
            storefront_publisher,
            config.broker.ecommerce_exchange.clone(),
            config.broker.ecommerce_status_routing_key.clone(),
        ),
    )));

    let grpc_addr = config.fulfillment.grpc_addr.clone();
    let grpc_service = fulfillment_service.clone();
    tokio::spawn(async move {
        if let Err(err) = microsvc::serve_grpc(grpc_service, &grpc_addr).await {
            error!(error = %err, "fulfillment gRPC server stopped");
        }
    });

    let admin_listener = tokio::net::TcpListener::bind(&config.fulfillment.http_addr).await?;
    let admin_router = fulfillment::router(fulfillment_service);
    tokio::spawn(async move {
        if let Err(err) = axum::serve(admin_listener, admin_router).await {
            error!(error = %err, "fulfillment HTTP server stopped");
        }
    });

    // Intake
    let intake_orders = Arc::new(InMemoryOrderStore::seeded(intake::seed::orders()));
    let crm_publisher: Arc<dyn Publisher> = Arc::new(crm_exchange);
    let client = GrpcFulfillmentClient::lazy(
        &config.intake.fulfillment_endpoint,
        config.intake.fulfillment_timeout(),
    )?;

    let order_intake = Arc::new(
        OrderIntake::new(
            Arc::new(InMemoryInventory::seeded(intake::seed::products())),
            intake_orders.clone(),
            client,
            BestEffort::new(
                crm_publisher,
                config.broker.crm_exchange.clone(),
                config.broker.crm_routing_key.clone(),
            ),
        )
        .with_mode(config.intake.inventory_mode)
        .with_timeout(config.intake.fulfillment_timeout()),
    );

    let listener = intake::spawn_listener(
        intake_orders,
        &config.broker.ecommerce_status_routing_key,
        storefront_exchange.new_subscriber(),
        config.intake.listener_poll_interval(),
    );

    let intake_listener = tokio::net::TcpListener::bind(&config.intake.http_addr).await?;
    info!(addr = %config.intake.http_addr, "intake HTTP listening");

    tokio::select! {
        result = axum::serve(intake_listener, intake::router(order_intake)) => {
            if let Err(err) = result {
                error!(error = %err, "intake HTTP server stopped");
            }
        }
        _ = tokio::signal::ctrl_c() => info!("shutdown requested"),
    }

    let stats = listener.stop();
    info!(handled = stats.handled, dropped = stats.failed, "status listener stopped");
    Ok(())
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
