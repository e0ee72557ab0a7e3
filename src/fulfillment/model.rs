//! Fulfillment-side records and wire messages.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::status::{DeliveryStatus, FulfillmentStatus};
use crate::store::Record;

/// The authoritative order-processing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentOrder {
    pub order_id: String,
    pub customer_id: String,
    pub product_id: String,
    pub status: FulfillmentStatus,
    /// Estimated ship date; unset for historical orders that never got one.
    pub ship_date: Option<NaiveDateTime>,
}

impl Record for FulfillmentOrder {
    const COLLECTION: &'static str = "fulfillment_orders";

    fn id(&self) -> &str {
        &self.order_id
    }
}

/// Input of the `order.create` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_id: String,
    pub product_id: String,
    pub quantity: u32,
}

/// Output of the `order.create` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub order_id: String,
    /// ISO-8601 local date-time, e.g. `2025-04-18T14:00:00`.
    pub delivery_date: String,
    /// Display name of the initial storefront status, `"Processing"`.
    pub delivery_status: String,
}

/// Input of the `order.status.update` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub bestell_id: String,
    pub status: String,
}

/// Message published to the storefront status exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontStatusEvent {
    pub bestell_id: String,
    pub status: DeliveryStatus,
}
