//! Order intake: validate, reserve, create remotely, record, notify CRM.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use super::client::FulfillmentClient;
use super::model::{CrmOrderEvent, DeliveryInfo, IntakeOrder, NewOrderRequest};
use crate::bus::{BestEffort, Publisher};
use crate::clock::{Clock, SystemClock};
use crate::config::InventoryMode;
use crate::error::OrderError;
use crate::fulfillment::{OrderAck, OrderRequest};
use crate::status::DeliveryStatus;
use crate::store::{InventoryStore, OrderStore, Product, StockError};

/// Status text the CRM receives for a freshly placed order.
pub const CRM_INITIAL_STATUS: &str = "Processing";

/// The intake workflow with its stores, client and CRM channel.
pub struct OrderIntake<C> {
    inventory: Arc<dyn InventoryStore>,
    orders: Arc<dyn OrderStore<IntakeOrder>>,
    fulfillment: C,
    crm: BestEffort<Arc<dyn Publisher>>,
    clock: Arc<dyn Clock>,
    mode: InventoryMode,
    timeout: Duration,
}

impl<C: FulfillmentClient> OrderIntake<C> {
    pub fn new(
        inventory: Arc<dyn InventoryStore>,
        orders: Arc<dyn OrderStore<IntakeOrder>>,
        fulfillment: C,
        crm: BestEffort<Arc<dyn Publisher>>,
    ) -> Self {
        Self {
            inventory,
            orders,
            fulfillment,
            crm,
            clock: Arc::new(SystemClock),
            mode: InventoryMode::default(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_mode(mut self, mode: InventoryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Upper bound on the remote order-creation call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn mode(&self) -> InventoryMode {
        self.mode
    }

    pub fn orders(&self) -> &Arc<dyn OrderStore<IntakeOrder>> {
        &self.orders
    }

    /// Place an order.
    ///
    /// Fails without side effects on validation errors. In mirrored mode the
    /// local stock is decremented first and given back if the remote call
    /// fails. Once the remote order exists, a failed CRM publish no longer
    /// affects the outcome.
    pub async fn place_order(&self, request: NewOrderRequest) -> Result<DeliveryInfo, OrderError> {
        let quantity = request.validate()?;

        info!(
            customer_id = %request.kunden_id,
            product_id = %request.produkt_id,
            quantity,
            mode = %self.mode,
            "placing order"
        );

        let product = match self.mode {
            InventoryMode::Mirrored => Some(self.reserve_locally(&request.produkt_id, quantity)?),
            InventoryMode::Authoritative => self.inventory.get(&request.produkt_id)?,
        };

        let remote = OrderRequest {
            customer_id: request.kunden_id.clone(),
            product_id: request.produkt_id.clone(),
            quantity,
        };

        let ack = match self.call_fulfillment(remote).await {
            Ok(ack) => ack,
            Err(err) => {
                warn!(product_id = %request.produkt_id, error = %err, "fulfillment call failed");
                if self.mode == InventoryMode::Mirrored {
                    self.release_locally(&request.produkt_id, quantity);
                }
                return Err(err);
            }
        };

        let (delivery_date, delivery_status) = parse_ack(&ack)?;
        let ordered_at = self.clock.now().naive_utc();

        self.orders.insert(IntakeOrder {
            order_id: ack.order_id.clone(),
            customer_id: request.kunden_id.clone(),
            email: request.email.clone(),
            address: request.adresse.clone(),
            product_id: request.produkt_id.clone(),
            quantity,
            ordered_at,
            delivery_status,
            delivery_date: Some(delivery_date),
            payment_method: request.zahlungsmethode.clone(),
        })?;

        info!(order_id = %ack.order_id, "order recorded");

        let total = order_total(product.as_ref(), quantity);

        self.crm.publish(&CrmOrderEvent {
            bestell_id: ack.order_id.clone(),
            kunden_id: request.kunden_id,
            bestelldatum: ordered_at.date(),
            gesamtbetrag: total,
            status: CRM_INITIAL_STATUS.to_string(),
            email: request.email,
            adress_zeichenkette: request.adresse,
        });

        Ok(DeliveryInfo {
            lieferdatum: delivery_date,
            lieferstatus: delivery_status,
        })
    }

    async fn call_fulfillment(&self, request: OrderRequest) -> Result<OrderAck, OrderError> {
        tokio::time::timeout(self.timeout, self.fulfillment.create_order(request))
            .await
            .map_err(|_| OrderError::DeadlineExceeded(self.timeout))?
    }

    fn reserve_locally(&self, product_id: &str, quantity: u32) -> Result<Product, OrderError> {
        let product = self
            .inventory
            .checked_decrement(product_id, quantity)
            .map_err(|err| {
                warn!(product_id, quantity, error = %err, "local stock reservation refused");
                match err {
                    StockError::Store(store) => OrderError::from(store),
                    other => OrderError::invalid(other.to_string()),
                }
            })?;

        info!(product_id, remaining = product.stock, "local stock updated");
        Ok(product)
    }

    fn release_locally(&self, product_id: &str, quantity: u32) {
        match self.inventory.restock(product_id, quantity) {
            Ok(product) => info!(product_id, restored = quantity, stock = product.stock, "local stock restored"),
            Err(err) => error!(product_id, quantity, error = %err, "failed to restore local stock"),
        }
    }
}

/// Unit price times quantity, zero when the price is unknown.
pub fn order_total(product: Option<&Product>, quantity: u32) -> Decimal {
    product
        .and_then(|p| p.sale_price)
        .map(|price| price * Decimal::from(quantity))
        .unwrap_or(Decimal::ZERO)
}

fn parse_ack(ack: &OrderAck) -> Result<(NaiveDateTime, DeliveryStatus), OrderError> {
    let status = ack.delivery_status.parse::<DeliveryStatus>().map_err(|_| {
        malformed_reply(ack, format!("unknown delivery status {}", ack.delivery_status))
    })?;

    let date = parse_delivery_date(&ack.delivery_date).ok_or_else(|| {
        malformed_reply(ack, format!("unparseable delivery date {}", ack.delivery_date))
    })?;

    Ok((date, status))
}

fn malformed_reply(ack: &OrderAck, detail: String) -> OrderError {
    error!(order_id = %ack.order_id, detail = %detail, "fulfillment reply rejected");
    OrderError::Unavailable(format!("malformed fulfillment reply: {}", detail))
}

/// ISO-8601 local date-time (seconds optional), with an RFC 3339 fallback.
fn parse_delivery_date(raw: &str) -> Option<NaiveDateTime> {
    raw.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
}
