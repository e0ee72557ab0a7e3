//! Operator-driven status changes and their storefront notification.

use tracing::{info, warn};

use super::model::{FulfillmentOrder, StorefrontStatusEvent};
use super::FulfillmentState;
use crate::error::OrderError;
use crate::status::{map_to_storefront, FulfillmentStatus};

/// Apply a status string to a stored order and notify the storefront.
///
/// The status is matched case-insensitively against the fulfillment
/// vocabulary. An unknown status or order id fails with `InvalidArgument`
/// before anything is written. The storefront publish is best-effort.
pub fn update_status(
    state: &FulfillmentState,
    order_id: &str,
    status: &str,
) -> Result<FulfillmentOrder, OrderError> {
    info!(order_id, status, "status update requested");

    let new_status: FulfillmentStatus = status.parse().map_err(|err| {
        warn!(order_id, status, "rejecting unknown status");
        err
    })?;

    let order = state
        .orders
        .update(order_id, &mut |order| order.status = new_status)?
        .ok_or_else(|| {
            warn!(order_id, "status update for unknown order");
            OrderError::invalid(format!("order not found: {}", order_id))
        })?;

    info!(order_id, status = %new_status, "order status updated");

    let storefront_status = map_to_storefront(new_status.as_str())?;

    state.storefront.publish(&StorefrontStatusEvent {
        bestell_id: order.order_id.clone(),
        status: storefront_status,
    });

    Ok(order)
}
