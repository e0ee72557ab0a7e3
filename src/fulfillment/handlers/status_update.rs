//! Handler: order.status.update

use serde_json::{json, Value};

use crate::fulfillment::model::StatusUpdateRequest;
use crate::fulfillment::status_update::update_status;
use crate::fulfillment::FulfillmentState;
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "order.status.update";

pub fn guard(ctx: &Context<FulfillmentState>) -> bool {
    ctx.has_fields(&["bestellId", "status"])
}

pub fn handle(ctx: &Context<FulfillmentState>) -> Result<Value, HandlerError> {
    let request = ctx.input::<StatusUpdateRequest>()?;
    let order = update_status(ctx.state(), &request.bestell_id, &request.status)?;
    Ok(json!({ "bestellId": order.order_id, "status": order.status }))
}
