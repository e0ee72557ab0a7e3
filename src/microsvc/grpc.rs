//! gRPC transport: maps tonic requests to command dispatch.
//!
//! Requires the `grpc` feature. Messages are prost structs in standard
//! protobuf wire format; the service stubs are generated by `build.rs`
//! without a `.proto` file.
//!
//! ## RPCs
//!
//! - `Dispatch`: run a command. Input and output bodies are JSON strings.
//!   Handler failures come back as a non-OK [`Status`] whose code reflects
//!   the [`OrderError`] kind.
//! - `Health`: liveness plus the list of registered commands.
//!
//! ```ignore
//! let service = Arc::new(fulfillment::service(state));
//! microsvc::serve_grpc(service, "127.0.0.1:9090").await?;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tonic::{Code, Request, Response, Status};

use super::error::HandlerError;
use super::service::Service;
use crate::error::OrderError;

// ---------------------------------------------------------------------------
// Message types
// ---------------------------------------------------------------------------

#[derive(Clone, prost::Message)]
pub struct DispatchRequest {
    #[prost(string, tag = "1")]
    pub command: String,
    /// JSON-encoded command input.
    #[prost(string, tag = "2")]
    pub input: String,
}

#[derive(Clone, prost::Message)]
pub struct DispatchReply {
    /// JSON-encoded handler result.
    #[prost(string, tag = "1")]
    pub body: String,
}

#[derive(Clone, prost::Message)]
pub struct HealthRequest {}

#[derive(Clone, prost::Message)]
pub struct HealthReply {
    #[prost(bool, tag = "1")]
    pub ok: bool,
    #[prost(string, repeated, tag = "2")]
    pub commands: Vec<String>,
}

// ---------------------------------------------------------------------------
// Generated service trait + server/client
// ---------------------------------------------------------------------------

include!(concat!(env!("OUT_DIR"), "/orderflow.rpc.CommandService.rs"));

pub use command_service_client::CommandServiceClient;
pub use command_service_server::{CommandService, CommandServiceServer};

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

impl HandlerError {
    /// Map this error to a gRPC status.
    ///
    /// Workflow failures carry only their detail; the receiving side adds
    /// the kind back through [`order_error_from_status`].
    pub fn grpc_status(&self) -> Status {
        let (code, message) = match self {
            HandlerError::UnknownCommand(_) => (Code::Unimplemented, self.to_string()),
            HandlerError::DecodeFailed(_) | HandlerError::GuardRejected(_) => {
                (Code::InvalidArgument, self.to_string())
            }
            HandlerError::Order(err) => {
                let code = match err {
                    OrderError::NotFound(_) => Code::NotFound,
                    OrderError::InvalidArgument(_) => Code::InvalidArgument,
                    OrderError::FailedPrecondition(_) => Code::FailedPrecondition,
                    OrderError::Unavailable(_) => Code::Unavailable,
                    OrderError::DeadlineExceeded(_) => Code::DeadlineExceeded,
                    OrderError::Storage(_) => Code::Internal,
                };
                (code, err.detail())
            }
        };
        Status::new(code, message)
    }
}

/// Translate a status returned by a remote command service into the local
/// error kind. The remote message is kept as the detail.
pub fn order_error_from_status(status: &Status, timeout: Duration) -> OrderError {
    let message = status.message().to_string();
    match status.code() {
        Code::NotFound => OrderError::NotFound(message),
        Code::InvalidArgument | Code::OutOfRange => OrderError::InvalidArgument(message),
        Code::FailedPrecondition => OrderError::FailedPrecondition(message),
        Code::DeadlineExceeded => OrderError::DeadlineExceeded(timeout),
        Code::Unavailable | Code::Unimplemented | Code::Cancelled => {
            OrderError::Unavailable(message)
        }
        _ => OrderError::Unavailable(format!("{}: {}", status.code(), message)),
    }
}

// ---------------------------------------------------------------------------
// Handler implementation
// ---------------------------------------------------------------------------

/// Implements the generated `CommandService` trait on top of a `Service<S>`.
pub struct GrpcHandler<S> {
    service: Arc<Service<S>>,
}

impl<S> GrpcHandler<S> {
    pub fn new(service: Arc<Service<S>>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl<S: Send + Sync + 'static> CommandService for GrpcHandler<S> {
    async fn dispatch(
        &self,
        request: Request<DispatchRequest>,
    ) -> Result<Response<DispatchReply>, Status> {
        let req = request.into_inner();

        let input: serde_json::Value = if req.input.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&req.input)
                .map_err(|e| HandlerError::from(e).grpc_status())?
        };

        self.service
            .dispatch(&req.command, input)
            .map(|value| {
                Response::new(DispatchReply {
                    body: value.to_string(),
                })
            })
            .map_err(|e| e.grpc_status())
    }

    async fn health(
        &self,
        _request: Request<HealthRequest>,
    ) -> Result<Response<HealthReply>, Status> {
        let commands = self
            .service
            .commands()
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(Response::new(HealthReply { ok: true, commands }))
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// Create a `CommandServiceServer` from a shared `Service<S>`.
pub fn grpc_server<S: Send + Sync + 'static>(
    service: Arc<Service<S>>,
) -> CommandServiceServer<GrpcHandler<S>> {
    CommandServiceServer::new(GrpcHandler::new(service))
}

/// Errors from [`serve_grpc`].
#[derive(Debug, thiserror::Error)]
pub enum ServeGrpcError {
    #[error("invalid gRPC address {addr}: {source}")]
    InvalidAddr {
        addr: String,
        source: std::net::AddrParseError,
    },
    #[error(transparent)]
    Transport(#[from] tonic::transport::Error),
}

/// Bind and serve the gRPC transport at `addr` (e.g. `"127.0.0.1:9090"`).
pub async fn serve_grpc<S: Send + Sync + 'static>(
    service: Arc<Service<S>>,
    addr: &str,
) -> Result<(), ServeGrpcError> {
    let socket: SocketAddr = addr.parse().map_err(|source| ServeGrpcError::InvalidAddr {
        addr: addr.to_string(),
        source,
    })?;

    tracing::info!(%socket, commands = ?service.commands(), "gRPC command service listening");

    tonic::transport::Server::builder()
        .add_service(grpc_server(service))
        .serve(socket)
        .await?;
    Ok(())
}
