//! Network surfaces: the gRPC command service and both HTTP routers.

mod support;

#[cfg(feature = "grpc")]
mod grpc;
