//! Pull-based consumer side of the broker.

use super::publisher::{Event, PublishError};

/// Consumes messages from one exchange.
pub trait Subscriber: Send + Sync {
    /// Poll for the next message, blocking until one is available or the timeout expires.
    fn poll(&self, timeout_ms: u64) -> Result<Option<Event>, PublishError>;

    /// Acknowledge that a message has been processed.
    fn ack(&self, event_id: &str) -> Result<(), PublishError>;

    /// Reject a message. Whether it is redelivered is up to the broker.
    fn nack(&self, event_id: &str, reason: &str) -> Result<(), PublishError>;
}

/// Subscribers that can open further independent consumers on the same exchange.
pub trait Subscribable: Subscriber + Sized {
    /// A new consumer with its own read position.
    fn new_subscriber(&self) -> Self;
}
