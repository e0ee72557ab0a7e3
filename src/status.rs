//! Status vocabularies of the two services and the translation between them.
//!
//! The fulfillment side tracks `PROCESSED | SHIPPED | CANCELLED`; the
//! storefront (intake) side tracks `PROCESSING | SHIPPED | DELIVERED`. The
//! sets are related only through [`to_storefront`], never by name equality:
//!
//! | Fulfillment | Storefront |
//! |---|---|
//! | `SHIPPED`   | `SHIPPED`    |
//! | `CANCELLED` | `DELIVERED`  |
//! | `PROCESSED` | `PROCESSING` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OrderError;

/// Order status as recorded by the fulfillment service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    Processed,
    Shipped,
    Cancelled,
}

/// Delivery status as recorded by the intake service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Processing,
    Shipped,
    Delivered,
}

impl FulfillmentStatus {
    pub const ALL: [FulfillmentStatus; 3] = [
        FulfillmentStatus::Processed,
        FulfillmentStatus::Shipped,
        FulfillmentStatus::Cancelled,
    ];

    /// Wire name, e.g. `"PROCESSED"`.
    pub fn as_str(self) -> &'static str {
        match self {
            FulfillmentStatus::Processed => "PROCESSED",
            FulfillmentStatus::Shipped => "SHIPPED",
            FulfillmentStatus::Cancelled => "CANCELLED",
        }
    }

    /// Human-readable name, e.g. `"Processed"`.
    pub fn display_name(self) -> &'static str {
        match self {
            FulfillmentStatus::Processed => "Processed",
            FulfillmentStatus::Shipped => "Shipped",
            FulfillmentStatus::Cancelled => "Cancelled",
        }
    }
}

impl DeliveryStatus {
    pub const ALL: [DeliveryStatus; 3] = [
        DeliveryStatus::Processing,
        DeliveryStatus::Shipped,
        DeliveryStatus::Delivered,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Processing => "PROCESSING",
            DeliveryStatus::Shipped => "SHIPPED",
            DeliveryStatus::Delivered => "DELIVERED",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DeliveryStatus::Processing => "Processing",
            DeliveryStatus::Shipped => "Shipped",
            DeliveryStatus::Delivered => "Delivered",
        }
    }
}

impl FromStr for FulfillmentStatus {
    type Err = OrderError;

    /// Case-insensitive match against the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FulfillmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| OrderError::invalid(format!("unknown order status: {}", s)))
    }
}

impl FromStr for DeliveryStatus {
    type Err = OrderError;

    /// Case-insensitive match against the wire names. Display names such as
    /// `"Processing"` match too, since they differ only in case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeliveryStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| OrderError::invalid(format!("unknown delivery status: {}", s)))
    }
}

impl fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translate a fulfillment status into the storefront vocabulary.
pub fn to_storefront(status: FulfillmentStatus) -> DeliveryStatus {
    match status {
        FulfillmentStatus::Shipped => DeliveryStatus::Shipped,
        FulfillmentStatus::Cancelled => DeliveryStatus::Delivered,
        FulfillmentStatus::Processed => DeliveryStatus::Processing,
    }
}

/// Translate a raw fulfillment status string into the storefront vocabulary.
///
/// Rejects anything outside the fulfillment vocabulary on its own, whether
/// or not the caller validated the input first.
pub fn map_to_storefront(status: &str) -> Result<DeliveryStatus, OrderError> {
    status.parse::<FulfillmentStatus>().map(to_storefront)
}
