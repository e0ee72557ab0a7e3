//! microsvc - convention-based command handler framework.
//!
//! Build a service by registering command handlers on a [`Service`]. Each
//! handler receives a [`Context`] with the JSON input and the service state.
//! The same service can be reached in-process ([`Service::dispatch`]), from
//! a broker exchange ([`subscribe`]), over HTTP ([`router`]) and over gRPC
//! ([`grpc_server`]).
//!
//! ## Handler Convention
//!
//! Each handler module exports:
//!
//! ```ignore
//! pub const COMMAND: &str = "order.create";
//!
//! pub fn guard(ctx: &microsvc::Context<FulfillmentState>) -> bool {
//!     ctx.has_fields(&["customerId", "productId", "quantity"])
//! }
//!
//! pub fn handle(ctx: &microsvc::Context<FulfillmentState>) -> Result<Value, microsvc::HandlerError> {
//!     // ...
//! }
//! ```
//!
//! and is registered with [`register_handlers!`](crate::register_handlers).

mod context;
mod error;
mod service;

pub use context::Context;
pub use error::HandlerError;
pub use service::{subscribe, Service, TransportHandle, TransportStats};

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{error_response, router};

#[cfg(feature = "grpc")]
pub mod grpc;
#[cfg(feature = "grpc")]
pub use grpc::{grpc_server, serve_grpc};

/// Register handler modules with a service using the convention pattern.
///
/// Each handler module must export `COMMAND`, `guard` and `handle`.
///
/// ```ignore
/// let service = orderflow::register_handlers!(
///     microsvc::Service::new(state),
///     handlers::order_create,
///     handlers::status_update,
/// );
/// ```
#[macro_export]
macro_rules! register_handlers {
    ($service:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $service
        $(
            .command_guarded(
                $($seg)::+::COMMAND,
                $($seg)::+::guard,
                $($seg)::+::handle,
            )
        )+
    };
}
