//! How the intake service reaches the fulfillment procedure.

use std::future::Future;
use std::sync::Arc;

use crate::error::OrderError;
use crate::fulfillment::handlers::order_create;
use crate::fulfillment::{FulfillmentState, OrderAck, OrderRequest};
use crate::microsvc::{HandlerError, Service};

/// One synchronous round trip to the order-creation procedure.
pub trait FulfillmentClient: Send + Sync {
    fn create_order(
        &self,
        request: OrderRequest,
    ) -> impl Future<Output = Result<OrderAck, OrderError>> + Send;
}

/// Calls a fulfillment service living in the same process.
#[derive(Clone)]
pub struct LocalFulfillmentClient {
    service: Arc<Service<FulfillmentState>>,
}

impl LocalFulfillmentClient {
    pub fn new(service: Arc<Service<FulfillmentState>>) -> Self {
        Self { service }
    }
}

impl FulfillmentClient for LocalFulfillmentClient {
    async fn create_order(&self, request: OrderRequest) -> Result<OrderAck, OrderError> {
        let input = serde_json::to_value(&request)
            .map_err(|e| OrderError::invalid(e.to_string()))?;

        let reply = self
            .service
            .dispatch(order_create::COMMAND, input)
            .map_err(into_order_error)?;

        serde_json::from_value(reply)
            .map_err(|e| OrderError::Unavailable(format!("malformed fulfillment reply: {}", e)))
    }
}

fn into_order_error(err: HandlerError) -> OrderError {
    let message = err.to_string();
    match err {
        HandlerError::Order(err) => err,
        HandlerError::UnknownCommand(_) => OrderError::Unavailable(message),
        HandlerError::DecodeFailed(_) | HandlerError::GuardRejected(_) => {
            OrderError::invalid(message)
        }
    }
}

#[cfg(feature = "grpc")]
pub use grpc::GrpcFulfillmentClient;

#[cfg(feature = "grpc")]
mod grpc {
    use std::time::Duration;

    use tonic::transport::{Channel, Endpoint};

    use super::*;
    use crate::microsvc::grpc::{order_error_from_status, CommandServiceClient, DispatchRequest};

    /// Calls the fulfillment service over the gRPC `Dispatch` RPC.
    #[derive(Debug, Clone)]
    pub struct GrpcFulfillmentClient {
        client: CommandServiceClient<Channel>,
        timeout: Duration,
    }

    impl GrpcFulfillmentClient {
        pub fn new(channel: Channel, timeout: Duration) -> Self {
            Self {
                client: CommandServiceClient::new(channel),
                timeout,
            }
        }

        /// Build a client that connects on first use. Must be called inside
        /// a tokio runtime.
        pub fn lazy(endpoint: &str, timeout: Duration) -> Result<Self, OrderError> {
            let endpoint = Endpoint::from_shared(endpoint.to_string())
                .map_err(|e| OrderError::invalid(format!("fulfillment endpoint {}: {}", endpoint, e)))?
                .timeout(timeout);
            Ok(Self::new(endpoint.connect_lazy(), timeout))
        }
    }

    impl FulfillmentClient for GrpcFulfillmentClient {
        async fn create_order(&self, request: OrderRequest) -> Result<OrderAck, OrderError> {
            let input = serde_json::to_string(&request)
                .map_err(|e| OrderError::invalid(e.to_string()))?;

            let mut client = self.client.clone();
            let reply = client
                .dispatch(DispatchRequest {
                    command: order_create::COMMAND.to_string(),
                    input,
                })
                .await
                .map_err(|status| order_error_from_status(&status, self.timeout))?
                .into_inner();

            serde_json::from_str(&reply.body)
                .map_err(|e| OrderError::Unavailable(format!("malformed fulfillment reply: {}", e)))
        }
    }
}
