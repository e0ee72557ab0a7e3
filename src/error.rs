//! Error taxonomy shared by the intake and fulfillment services.

use std::time::Duration;

use thiserror::Error;

/// Failure kinds surfaced by the order workflows.
///
/// The first three are local validation outcomes and are never retried.
/// `Unavailable` and `DeadlineExceeded` only arise on the intake side when
/// the remote order-creation call fails in transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Unknown product or order id.
    #[error("not found: {0}")]
    NotFound(String),
    /// Malformed request or unrecognised status string.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Insufficient stock.
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),
    /// The remote procedure could not be reached.
    #[error("fulfillment unavailable: {0}")]
    Unavailable(String),
    /// The remote procedure did not answer in time.
    #[error("fulfillment did not respond within {0:?}")]
    DeadlineExceeded(Duration),
    /// Store failure (poisoned lock, serialization).
    #[error("storage error: {0}")]
    Storage(String),
}

impl OrderError {
    pub fn not_found(what: impl Into<String>) -> Self {
        OrderError::NotFound(what.into())
    }

    pub fn invalid(what: impl Into<String>) -> Self {
        OrderError::InvalidArgument(what.into())
    }

    pub fn precondition(what: impl Into<String>) -> Self {
        OrderError::FailedPrecondition(what.into())
    }

    /// The message without the kind prefix that `Display` adds.
    pub fn detail(&self) -> String {
        match self {
            OrderError::NotFound(detail)
            | OrderError::InvalidArgument(detail)
            | OrderError::FailedPrecondition(detail)
            | OrderError::Unavailable(detail)
            | OrderError::Storage(detail) => detail.clone(),
            OrderError::DeadlineExceeded(timeout) => format!("no response within {:?}", timeout),
        }
    }
}

impl From<crate::store::StoreError> for OrderError {
    fn from(err: crate::store::StoreError) -> Self {
        OrderError::Storage(err.to_string())
    }
}
