//! Context passed to command handlers.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::HandlerError;

/// What a handler sees: the command name, its JSON input and the service state.
///
/// ```ignore
/// pub fn handle(ctx: &Context<FulfillmentState>) -> Result<Value, HandlerError> {
///     let request = ctx.input::<OrderRequest>()?;
///     let ack = create_order(ctx.state(), &request)?;
///     Ok(serde_json::to_value(ack)?)
/// }
/// ```
pub struct Context<'a, S> {
    command_name: &'a str,
    input: Value,
    state: &'a S,
}

impl<'a, S> Context<'a, S> {
    pub(crate) fn new(command_name: &'a str, input: Value, state: &'a S) -> Self {
        Self {
            command_name,
            input,
            state,
        }
    }

    /// Deserialize the input payload into a typed struct.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        serde_json::from_value(self.input.clone())
            .map_err(|e| HandlerError::DecodeFailed(e.to_string()))
    }

    pub fn raw_input(&self) -> &Value {
        &self.input
    }

    pub fn command_name(&self) -> &str {
        self.command_name
    }

    pub fn state(&self) -> &S {
        self.state
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.input.get(field).is_some_and(|v| !v.is_null())
    }

    pub fn has_fields(&self, fields: &[&str]) -> bool {
        fields.iter().all(|f| self.has_field(f))
    }
}
