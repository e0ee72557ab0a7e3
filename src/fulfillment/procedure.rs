//! Remote order creation.

use chrono::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use super::model::{FulfillmentOrder, OrderAck, OrderRequest};
use super::FulfillmentState;
use crate::error::OrderError;
use crate::status::{to_storefront, FulfillmentStatus};
use crate::store::StockError;

/// Days between order creation and the estimated ship date.
pub const LEAD_TIME_DAYS: i64 = 3;

/// Wire format of ship dates.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Reserve stock and record a new order.
///
/// Validation happens before any mutation: an unknown product fails with
/// `NotFound` and insufficient stock with `FailedPrecondition`, both leaving
/// inventory and orders untouched.
pub fn create_order(state: &FulfillmentState, request: &OrderRequest) -> Result<OrderAck, OrderError> {
    info!(
        customer_id = %request.customer_id,
        product_id = %request.product_id,
        quantity = request.quantity,
        "creating order"
    );

    if request.quantity == 0 {
        return Err(OrderError::invalid("quantity must be at least 1"));
    }

    let product = state
        .inventory
        .checked_decrement(&request.product_id, request.quantity)
        .map_err(|err| {
            warn!(product_id = %request.product_id, error = %err, "stock reservation refused");
            reservation_error(err)
        })?;

    info!(
        product_id = %product.id,
        remaining = product.stock,
        "stock updated"
    );

    let order_id = Uuid::new_v4().to_string();
    let ship_date = state.clock.now().naive_utc() + Duration::days(LEAD_TIME_DAYS);

    state.orders.insert(FulfillmentOrder {
        order_id: order_id.clone(),
        customer_id: request.customer_id.clone(),
        product_id: request.product_id.clone(),
        status: FulfillmentStatus::Processed,
        ship_date: Some(ship_date),
    })?;

    info!(order_id = %order_id, ship_date = %ship_date, "order recorded");

    Ok(OrderAck {
        order_id,
        delivery_date: ship_date.format(DATE_TIME_FORMAT).to_string(),
        delivery_status: to_storefront(FulfillmentStatus::Processed)
            .display_name()
            .to_string(),
    })
}

fn reservation_error(err: StockError) -> OrderError {
    let message = err.to_string();
    match err {
        StockError::UnknownProduct(id) => OrderError::not_found(format!("product {}", id)),
        StockError::InsufficientStock { .. } => OrderError::precondition(message),
        StockError::Store(store) => store.into(),
    }
}
