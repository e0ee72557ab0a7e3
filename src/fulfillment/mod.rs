//! Fulfillment service: inventory owner and authoritative order records.
//!
//! Exposes two commands on a [`microsvc::Service`]:
//!
//! - `order.create` ([`create_order`]): reserve stock, record the order,
//!   answer with the order id and estimated ship date.
//! - `order.status.update` ([`update_status`]): change an order's status and
//!   tell the storefront through the status exchange.

pub mod handlers;
pub mod model;
pub mod procedure;
pub mod seed;
pub mod status_update;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::router;

use std::sync::Arc;

use crate::bus::{BestEffort, Publisher};
use crate::clock::{Clock, SystemClock};
use crate::microsvc;
use crate::store::{InMemoryInventory, InMemoryOrderStore, InventoryStore, OrderStore};

pub use model::{FulfillmentOrder, OrderAck, OrderRequest, StatusUpdateRequest, StorefrontStatusEvent};
pub use procedure::{create_order, LEAD_TIME_DAYS};
pub use status_update::update_status;

/// Everything the fulfillment workflows touch.
pub struct FulfillmentState {
    pub inventory: Arc<dyn InventoryStore>,
    pub orders: Arc<dyn OrderStore<FulfillmentOrder>>,
    /// Storefront status exchange.
    pub storefront: BestEffort<Arc<dyn Publisher>>,
    pub clock: Arc<dyn Clock>,
}

impl FulfillmentState {
    pub fn new(
        inventory: Arc<dyn InventoryStore>,
        orders: Arc<dyn OrderStore<FulfillmentOrder>>,
        storefront: BestEffort<Arc<dyn Publisher>>,
    ) -> Self {
        Self {
            inventory,
            orders,
            storefront,
            clock: Arc::new(SystemClock),
        }
    }

    /// State backed by in-memory stores holding the seed catalogue and orders.
    pub fn seeded(storefront: BestEffort<Arc<dyn Publisher>>) -> Self {
        Self::new(
            Arc::new(InMemoryInventory::seeded(seed::products())),
            Arc::new(InMemoryOrderStore::seeded(seed::orders())),
            storefront,
        )
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }
}

/// Build the fulfillment command service.
pub fn service(state: FulfillmentState) -> microsvc::Service<FulfillmentState> {
    crate::register_handlers!(
        microsvc::Service::new(state),
        handlers::order_create,
        handlers::status_update,
    )
}
