//! Test wiring: both services on in-memory stores and exchanges, with the
//! intake side calling fulfillment in-process.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use orderflow::bus::{BestEffort, Event, InMemoryQueue, PublishError, Publisher};
use orderflow::clock::FixedClock;
use orderflow::config::InventoryMode;
use orderflow::fulfillment::{self, FulfillmentOrder, FulfillmentState, OrderAck, OrderRequest};
use orderflow::intake::{FulfillmentClient, IntakeOrder, LocalFulfillmentClient, NewOrderRequest, OrderIntake};
use orderflow::microsvc::Service;
use orderflow::store::{InMemoryInventory, InMemoryOrderStore, Product};
use orderflow::OrderError;
use rust_decimal::Decimal;

pub const PRODUCT: &str = "PROD-001";
pub const CRM_EXCHANGE: &str = "crm.direct.exchange";
pub const CRM_ROUTING_KEY: &str = "crm.updates.routingkey";
pub const STOREFRONT_EXCHANGE: &str = "ecommerce.direct.exchange";
pub const STOREFRONT_ROUTING_KEY: &str = "ecommerce.status.routingkey";

pub fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2025, 5, 1, 9, 30, 0).unwrap())
}

/// Ship date every order placed with [`clock`] gets.
pub fn expected_ship_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, 4)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

pub fn widget(stock: u32) -> Product {
    Product::new(PRODUCT, "Widget", "Tools", Decimal::new(500, 2), stock)
}

pub fn order_request(menge: i64) -> NewOrderRequest {
    NewOrderRequest {
        kunden_id: "CUST-1".into(),
        email: "anna@example.at".into(),
        adresse: "Getreidegasse 9, 5020 Salzburg".into(),
        produkt_id: PRODUCT.into(),
        menge,
        zahlungsmethode: "Rechnung".into(),
    }
}

/// A broker that refuses every message.
pub struct DownPublisher;

impl Publisher for DownPublisher {
    fn publish(&self, _event: Event) -> Result<(), PublishError> {
        Err(PublishError::ConnectionFailed("broker unreachable".into()))
    }
}

/// A fulfillment client that answers only after `delay`.
pub struct SlowClient {
    pub delay: Duration,
}

impl FulfillmentClient for SlowClient {
    fn create_order(
        &self,
        request: OrderRequest,
    ) -> impl Future<Output = Result<OrderAck, OrderError>> + Send {
        let delay = self.delay;
        async move {
            tokio::time::sleep(delay).await;
            Ok(OrderAck {
                order_id: format!("late-{}", request.customer_id),
                delivery_date: "2025-05-04T09:30:00".into(),
                delivery_status: "Processing".into(),
            })
        }
    }
}

/// A fulfillment client whose transport is down.
pub struct UnreachableClient;

impl FulfillmentClient for UnreachableClient {
    fn create_order(
        &self,
        _request: OrderRequest,
    ) -> impl Future<Output = Result<OrderAck, OrderError>> + Send {
        async { Err(OrderError::Unavailable("connection refused".into())) }
    }
}

pub struct Harness {
    pub fulfillment_inventory: InMemoryInventory,
    pub fulfillment_orders: InMemoryOrderStore<FulfillmentOrder>,
    pub intake_inventory: InMemoryInventory,
    pub intake_orders: InMemoryOrderStore<IntakeOrder>,
    pub crm: InMemoryQueue,
    pub storefront: InMemoryQueue,
    pub fulfillment: Arc<Service<FulfillmentState>>,
    pub intake: Arc<OrderIntake<LocalFulfillmentClient>>,
    mode: InventoryMode,
    crm_publisher: Arc<dyn Publisher>,
}

pub struct HarnessBuilder {
    fulfillment_stock: u32,
    intake_stock: u32,
    mode: InventoryMode,
    crm_down: bool,
    storefront_down: bool,
}

impl Harness {
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder {
            fulfillment_stock: 10,
            intake_stock: 10,
            mode: InventoryMode::Authoritative,
            crm_down: false,
            storefront_down: false,
        }
    }

    /// Both services seeded with `stock` units of [`PRODUCT`] at 5.00.
    pub fn new(stock: u32) -> Self {
        Self::builder().stock(stock).build()
    }

    pub fn fulfillment_stock(&self) -> u32 {
        self.fulfillment_inventory.stock(PRODUCT).unwrap().unwrap()
    }

    pub fn intake_stock(&self) -> u32 {
        self.intake_inventory.stock(PRODUCT).unwrap().unwrap()
    }

    pub fn fulfillment_state(&self) -> &FulfillmentState {
        self.fulfillment.state()
    }

    /// Another intake workflow over the same stores and CRM channel, calling
    /// fulfillment through `client`.
    pub fn intake_with<C: FulfillmentClient>(&self, client: C, timeout: Duration) -> OrderIntake<C> {
        OrderIntake::new(
            Arc::new(self.intake_inventory.clone()),
            Arc::new(self.intake_orders.clone()),
            client,
            BestEffort::new(self.crm_publisher.clone(), CRM_EXCHANGE, CRM_ROUTING_KEY),
        )
        .with_mode(self.mode)
        .with_timeout(timeout)
        .with_clock(clock())
    }
}

impl HarnessBuilder {
    pub fn stock(mut self, stock: u32) -> Self {
        self.fulfillment_stock = stock;
        self.intake_stock = stock;
        self
    }

    pub fn fulfillment_stock(mut self, stock: u32) -> Self {
        self.fulfillment_stock = stock;
        self
    }

    pub fn intake_stock(mut self, stock: u32) -> Self {
        self.intake_stock = stock;
        self
    }

    pub fn mirrored(mut self) -> Self {
        self.mode = InventoryMode::Mirrored;
        self
    }

    pub fn crm_down(mut self) -> Self {
        self.crm_down = true;
        self
    }

    pub fn storefront_down(mut self) -> Self {
        self.storefront_down = true;
        self
    }

    pub fn build(self) -> Harness {
        let fulfillment_inventory = InMemoryInventory::seeded([widget(self.fulfillment_stock)]);
        let fulfillment_orders = InMemoryOrderStore::new();
        let intake_inventory = InMemoryInventory::seeded([widget(self.intake_stock)]);
        let intake_orders = InMemoryOrderStore::new();
        let crm = InMemoryQueue::new(CRM_EXCHANGE);
        let storefront = InMemoryQueue::new(STOREFRONT_EXCHANGE);

        let storefront_publisher: Arc<dyn Publisher> = if self.storefront_down {
            Arc::new(DownPublisher)
        } else {
            Arc::new(storefront.clone())
        };
        let crm_publisher: Arc<dyn Publisher> = if self.crm_down {
            Arc::new(DownPublisher)
        } else {
            Arc::new(crm.clone())
        };

        let fulfillment = Arc::new(fulfillment::service(
            FulfillmentState::new(
                Arc::new(fulfillment_inventory.clone()),
                Arc::new(fulfillment_orders.clone()),
                BestEffort::new(storefront_publisher, STOREFRONT_EXCHANGE, STOREFRONT_ROUTING_KEY),
            )
            .with_clock(clock()),
        ));

        let intake = Arc::new(
            OrderIntake::new(
                Arc::new(intake_inventory.clone()),
                Arc::new(intake_orders.clone()),
                LocalFulfillmentClient::new(fulfillment.clone()),
                BestEffort::new(crm_publisher.clone(), CRM_EXCHANGE, CRM_ROUTING_KEY),
            )
            .with_mode(self.mode)
            .with_timeout(Duration::from_secs(2))
            .with_clock(clock()),
        );

        Harness {
            fulfillment_inventory,
            fulfillment_orders,
            intake_inventory,
            intake_orders,
            crm,
            storefront,
            fulfillment,
            intake,
            mode: self.mode,
            crm_publisher,
        }
    }
}

/// Poll `condition` until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}

