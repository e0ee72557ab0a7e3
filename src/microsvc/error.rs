//! Error types for command handlers.

use thiserror::Error;

use crate::error::OrderError;
use crate::store::StoreError;

/// Error type for command dispatch.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// No handler registered for this command name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// Payload could not be deserialized into the handler's input type.
    #[error("decode failed: {0}")]
    DecodeFailed(String),
    /// Guard rejected the input before the handler ran.
    #[error("guard rejected command: {0}")]
    GuardRejected(String),
    /// The workflow behind the handler failed.
    #[error(transparent)]
    Order(#[from] OrderError),
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        HandlerError::Order(err.into())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl HandlerError {
    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownCommand(_) => 404,
            HandlerError::DecodeFailed(_) => 400,
            HandlerError::GuardRejected(_) => 400,
            HandlerError::Order(err) => match err {
                OrderError::NotFound(_) => 404,
                OrderError::InvalidArgument(_) => 400,
                OrderError::FailedPrecondition(_) => 409,
                OrderError::Unavailable(_) => 503,
                OrderError::DeadlineExceeded(_) => 504,
                OrderError::Storage(_) => 500,
            },
        }
    }
}
