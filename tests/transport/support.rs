use std::sync::Arc;

use chrono::{TimeZone, Utc};
use orderflow::bus::{BestEffort, InMemoryQueue, Publisher};
use orderflow::clock::FixedClock;
use orderflow::fulfillment::{self, FulfillmentOrder, FulfillmentState};
use orderflow::intake::NewOrderRequest;
use orderflow::microsvc::Service;
use orderflow::status::FulfillmentStatus;
use orderflow::store::{InMemoryInventory, InMemoryOrderStore, Product};
use rust_decimal::Decimal;

pub const PRODUCT: &str = "PROD-001";
pub const KNOWN_ORDER: &str = "ORD-7";

pub fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2025, 5, 1, 9, 30, 0).unwrap())
}

pub fn widget(stock: u32) -> Product {
    Product::new(PRODUCT, "Widget", "Tools", Decimal::new(500, 2), stock)
}

/// A fulfillment service holding `stock` widgets and one processed order
/// [`KNOWN_ORDER`]. Returns its inventory and storefront exchange too.
pub fn fulfillment_service(stock: u32) -> (Arc<Service<FulfillmentState>>, InMemoryInventory, InMemoryQueue) {
    let inventory = InMemoryInventory::seeded([widget(stock)]);
    let orders = InMemoryOrderStore::seeded([FulfillmentOrder {
        order_id: KNOWN_ORDER.into(),
        customer_id: "CUST-7".into(),
        product_id: PRODUCT.into(),
        status: FulfillmentStatus::Processed,
        ship_date: None,
    }]);
    let storefront = InMemoryQueue::new("ecommerce.direct.exchange");
    let publisher: Arc<dyn Publisher> = Arc::new(storefront.clone());

    let state = FulfillmentState::new(
        Arc::new(inventory.clone()),
        Arc::new(orders),
        BestEffort::new(publisher, "ecommerce.direct.exchange", "ecommerce.status.routingkey"),
    )
    .with_clock(clock());

    (Arc::new(fulfillment::service(state)), inventory, storefront)
}

pub fn order_request(menge: i64) -> NewOrderRequest {
    NewOrderRequest {
        kunden_id: "CUST-1".into(),
        email: "anna@example.at".into(),
        adresse: "Getreidegasse 9, 5020 Salzburg".into(),
        produkt_id: PRODUCT.into(),
        menge,
        zahlungsmethode: "Kreditkarte".into(),
    }
}
