//! Handler: order.create
//!
//! The remote procedure the intake service calls for every order.

use serde_json::Value;

use crate::fulfillment::model::OrderRequest;
use crate::fulfillment::procedure::create_order;
use crate::fulfillment::FulfillmentState;
use crate::microsvc::{Context, HandlerError};

pub const COMMAND: &str = "order.create";

pub fn guard(ctx: &Context<FulfillmentState>) -> bool {
    ctx.has_fields(&["customerId", "productId", "quantity"])
}

pub fn handle(ctx: &Context<FulfillmentState>) -> Result<Value, HandlerError> {
    let request = ctx.input::<OrderRequest>()?;
    let ack = create_order(ctx.state(), &request)?;
    Ok(serde_json::to_value(ack)?)
}
