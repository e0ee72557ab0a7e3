//! Storefront status listener.
//!
//! Consumes status messages from the storefront exchange and overwrites the
//! delivery status of the matching intake order. Messages that cannot be
//! applied are logged and nacked; nothing is retried. Re-applying the same
//! message leaves the order unchanged, so at-least-once delivery is safe.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::{error, info, warn};

use super::model::{IntakeOrder, StorefrontStatusMessage};
use crate::bus::Subscriber;
use crate::error::OrderError;
use crate::microsvc::{self, Context, HandlerError, Service, TransportHandle};
use crate::status::DeliveryStatus;
use crate::store::OrderStore;

/// State of the listener service.
pub struct ReconcileState {
    pub orders: Arc<dyn OrderStore<IntakeOrder>>,
}

/// Apply one storefront status message to the intake order store.
pub fn apply_status_update(
    orders: &dyn OrderStore<IntakeOrder>,
    message: &StorefrontStatusMessage,
) -> Result<IntakeOrder, OrderError> {
    let Some(order_id) = message.bestell_id.as_deref().filter(|id| !id.trim().is_empty()) else {
        warn!(?message, "dropping status message without order id");
        return Err(OrderError::invalid("status message without order id"));
    };

    if orders.get(order_id)?.is_none() {
        warn!(order_id, "dropping status message for unknown order");
        return Err(OrderError::not_found(format!("order {}", order_id)));
    }

    let raw_status = message.status.as_deref().unwrap_or_default();
    let status: DeliveryStatus = raw_status.parse().map_err(|err| {
        error!(order_id, status = raw_status, "dropping status message with unknown status");
        err
    })?;

    let order = orders
        .update(order_id, &mut |order| order.delivery_status = status)?
        .ok_or_else(|| OrderError::not_found(format!("order {}", order_id)))?;

    info!(order_id, status = %status, "delivery status updated");
    Ok(order)
}

fn handle(ctx: &Context<ReconcileState>) -> Result<Value, HandlerError> {
    let message = ctx.input::<StorefrontStatusMessage>()?;
    let order = apply_status_update(ctx.state().orders.as_ref(), &message)?;
    Ok(json!({ "bestellId": order.order_id, "status": order.delivery_status }))
}

/// Listener service handling messages published under `routing_key`.
pub fn listener_service(
    orders: Arc<dyn OrderStore<IntakeOrder>>,
    routing_key: &str,
) -> Service<ReconcileState> {
    Service::new(ReconcileState { orders }).command(routing_key, handle)
}

/// Start the listener on a background thread.
pub fn spawn_listener<S>(
    orders: Arc<dyn OrderStore<IntakeOrder>>,
    routing_key: &str,
    subscriber: S,
    poll_interval: Duration,
) -> TransportHandle
where
    S: Subscriber + 'static,
{
    info!(routing_key, "starting storefront status listener");
    microsvc::subscribe(
        Arc::new(listener_service(orders, routing_key)),
        subscriber,
        poll_interval,
    )
}
