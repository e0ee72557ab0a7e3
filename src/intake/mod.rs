//! Intake service: accepts storefront orders and relays them to fulfillment.
//!
//! - [`OrderIntake::place_order`]: the order workflow.
//! - [`reconcile`]: the storefront status listener keeping delivery status
//!   in step with fulfillment.

pub mod client;
pub mod model;
pub mod reconcile;
pub mod seed;
pub mod workflow;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::router;

pub use client::{FulfillmentClient, LocalFulfillmentClient};
#[cfg(feature = "grpc")]
pub use client::GrpcFulfillmentClient;
pub use model::{CrmOrderEvent, DeliveryInfo, IntakeOrder, NewOrderRequest, StorefrontStatusMessage};
pub use reconcile::{apply_status_update, listener_service, spawn_listener};
pub use workflow::{order_total, OrderIntake};
