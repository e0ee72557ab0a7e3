//! Fire-and-forget publishing.

use serde::Serialize;
use tracing::{debug, error};
use uuid::Uuid;

use super::{Event, Publisher};

/// Wraps a [`Publisher`] so that failures are logged and dropped.
///
/// Used for side-channel notifications (CRM updates, storefront status) whose
/// delivery must never fail the request that triggered them.
#[derive(Clone)]
pub struct BestEffort<P> {
    exchange: String,
    routing_key: String,
    publisher: P,
}

impl<P: Publisher> BestEffort<P> {
    pub fn new(publisher: P, exchange: impl Into<String>, routing_key: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            routing_key: routing_key.into(),
            publisher,
        }
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn routing_key(&self) -> &str {
        &self.routing_key
    }

    /// Serialize `payload` as JSON and publish it under a fresh message id.
    ///
    /// Returns whether the broker accepted the message. Callers are free to
    /// ignore the result.
    pub fn publish<T: Serialize>(&self, payload: &T) -> bool {
        let message_id = Uuid::new_v4().to_string();

        let result = Event::json(message_id.as_str(), self.routing_key.as_str(), payload)
            .and_then(|event| self.publisher.publish(event));

        match result {
            Ok(()) => {
                debug!(
                    exchange = %self.exchange,
                    routing_key = %self.routing_key,
                    message_id = %message_id,
                    "message published"
                );
                true
            }
            Err(err) => {
                error!(
                    exchange = %self.exchange,
                    routing_key = %self.routing_key,
                    error = %err,
                    "failed to publish message"
                );
                false
            }
        }
    }
}
