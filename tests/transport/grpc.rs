//! Fulfillment over gRPC: a tonic server on port 0 and the generated client.

use std::sync::Arc;
use std::time::Duration;

use orderflow::bus::{BestEffort, InMemoryQueue, Publisher};
use orderflow::fulfillment::{FulfillmentState, OrderAck, OrderRequest};
use orderflow::intake::{CrmOrderEvent, FulfillmentClient, GrpcFulfillmentClient, OrderIntake};
use orderflow::microsvc::grpc::{CommandServiceClient, DispatchRequest, HealthRequest};
use orderflow::microsvc::{self, Service};
use orderflow::status::DeliveryStatus;
use orderflow::store::{InMemoryInventory, InMemoryOrderStore, OrderStore};
use orderflow::OrderError;
use serde_json::json;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Channel, Endpoint};
use tonic::Code;

use crate::support::{clock, fulfillment_service, order_request, widget, PRODUCT};

/// Bind to port 0, spawn the gRPC server, and return its endpoint.
async fn start_server(service: Arc<Service<FulfillmentState>>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let grpc_svc = microsvc::grpc_server(service);
    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(grpc_svc)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    format!("http://{addr}")
}

async fn channel(endpoint: &str) -> Channel {
    Endpoint::from_shared(endpoint.to_string())
        .unwrap()
        .connect()
        .await
        .unwrap()
}

fn create_request(quantity: u32) -> OrderRequest {
    OrderRequest {
        customer_id: "CUST-1".into(),
        product_id: PRODUCT.into(),
        quantity,
    }
}

#[tokio::test]
async fn health_lists_fulfillment_commands() {
    let (service, _, _) = fulfillment_service(10);
    let endpoint = start_server(service).await;
    let mut client = CommandServiceClient::new(channel(&endpoint).await);

    let resp = client.health(HealthRequest {}).await.unwrap().into_inner();

    assert!(resp.ok);
    assert_eq!(resp.commands, vec!["order.create", "order.status.update"]);
}

#[tokio::test]
async fn dispatch_creates_an_order() {
    let (service, inventory, _) = fulfillment_service(10);
    let endpoint = start_server(service).await;
    let mut client = CommandServiceClient::new(channel(&endpoint).await);

    let reply = client
        .dispatch(DispatchRequest {
            command: "order.create".into(),
            input: json!({ "customerId": "CUST-1", "productId": PRODUCT, "quantity": 4 }).to_string(),
        })
        .await
        .unwrap()
        .into_inner();

    let ack: OrderAck = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(ack.delivery_date, "2025-05-04T09:30:00");
    assert_eq!(ack.delivery_status, "Processing");
    assert_eq!(inventory.stock(PRODUCT).unwrap(), Some(6));
}

#[tokio::test]
async fn dispatch_errors_carry_status_codes() {
    let (service, inventory, _) = fulfillment_service(2);
    let endpoint = start_server(service).await;
    let mut client = CommandServiceClient::new(channel(&endpoint).await);

    let cases = [
        ("order.create", json!({ "customerId": "C", "productId": PRODUCT, "quantity": 5 }), Code::FailedPrecondition),
        ("order.create", json!({ "customerId": "C", "productId": "PROD-404", "quantity": 1 }), Code::NotFound),
        ("order.create", json!({ "customerId": "C" }), Code::InvalidArgument),
        ("order.status.update", json!({ "bestellId": "ORD-7", "status": "lost" }), Code::InvalidArgument),
        ("order.refund", json!({}), Code::Unimplemented),
    ];

    for (command, input, code) in cases {
        let status = client
            .dispatch(DispatchRequest {
                command: command.into(),
                input: input.to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(status.code(), code, "{command} {input}: {}", status.message());
    }

    assert_eq!(inventory.stock(PRODUCT).unwrap(), Some(2));
}

#[tokio::test]
async fn client_translates_status_back_to_order_errors() {
    let (service, _, _) = fulfillment_service(2);
    let endpoint = start_server(service).await;
    let client = GrpcFulfillmentClient::new(channel(&endpoint).await, Duration::from_secs(2));

    let ack = client.create_order(create_request(1)).await.unwrap();
    assert_eq!(ack.delivery_status, "Processing");

    let err = client.create_order(create_request(5)).await.unwrap_err();
    assert!(matches!(err, OrderError::FailedPrecondition(_)), "{err:?}");
    assert_eq!(
        err.to_string(),
        "failed precondition: insufficient stock for product PROD-001: requested 5, available 1"
    );

    let err = client
        .create_order(OrderRequest {
            product_id: "PROD-404".into(),
            ..create_request(1)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::NotFound(_)), "{err:?}");
}

#[tokio::test]
async fn intake_places_orders_over_grpc() {
    let (service, inventory, _) = fulfillment_service(10);
    let endpoint = start_server(service).await;

    let crm = InMemoryQueue::new("crm.direct.exchange");
    let crm_publisher: Arc<dyn Publisher> = Arc::new(crm.clone());
    let orders = InMemoryOrderStore::new();
    let intake = OrderIntake::new(
        Arc::new(InMemoryInventory::seeded([widget(10)])),
        Arc::new(orders.clone()),
        GrpcFulfillmentClient::lazy(&endpoint, Duration::from_secs(2)).unwrap(),
        BestEffort::new(crm_publisher, "crm.direct.exchange", "crm.updates.routingkey"),
    )
    .with_clock(clock());

    let info = intake.place_order(order_request(2)).await.unwrap();

    assert_eq!(info.lieferstatus, DeliveryStatus::Processing);
    assert_eq!(inventory.stock(PRODUCT).unwrap(), Some(8));
    assert_eq!(orders.len().unwrap(), 1);
    assert_eq!(crm.decoded::<CrmOrderEvent>().len(), 1);

    let err = intake.place_order(order_request(50)).await.unwrap_err();
    assert!(matches!(err, OrderError::FailedPrecondition(_)), "{err:?}");
    assert_eq!(orders.len().unwrap(), 1);
}

#[tokio::test]
async fn unreachable_endpoint_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GrpcFulfillmentClient::lazy(&format!("http://{addr}"), Duration::from_secs(1)).unwrap();

    let err = client.create_order(create_request(1)).await.unwrap_err();
    assert!(matches!(err, OrderError::Unavailable(_)), "{err:?}");
}

#[tokio::test]
async fn malformed_endpoint_is_rejected() {
    let err = GrpcFulfillmentClient::lazy("not a uri", Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, OrderError::InvalidArgument(_)));
}
