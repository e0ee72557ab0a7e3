//! Core publisher types for the message broker.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// A message published to an exchange.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Unique identifier for this message.
    pub id: String,
    /// Routing key the message was published with (e.g. `"crm.updates.routingkey"`).
    pub routing_key: String,
    /// JSON payload.
    pub payload: Vec<u8>,
    /// Optional headers (correlation ids and the like).
    pub metadata: Option<Vec<(String, String)>>,
}

impl Event {
    pub fn new(id: impl Into<String>, routing_key: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            routing_key: routing_key.into(),
            payload,
            metadata: None,
        }
    }

    /// Create a message with a JSON-serialized payload.
    pub fn json<T: Serialize>(
        id: impl Into<String>,
        routing_key: impl Into<String>,
        payload: &T,
    ) -> Result<Self, PublishError> {
        let bytes = serde_json::to_vec(payload)
            .map_err(|e| PublishError::SerializationFailed(e.to_string()))?;
        Ok(Self::new(id, routing_key, bytes))
    }

    /// Create a message with a raw string payload.
    pub fn with_string_payload(
        id: impl Into<String>,
        routing_key: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self::new(id, routing_key, payload.into().into_bytes())
    }

    /// Decode the JSON payload.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    /// Get the payload as a string (if valid UTF-8).
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

/// Error type for broker operations.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("serialization failed: {0}")]
    SerializationFailed(String),
    #[error("message rejected: {0}")]
    Rejected(String),
    #[error("publish timeout")]
    Timeout,
}

/// Publishes messages to one exchange.
///
/// An implementation is bound to a single exchange; the routing key travels
/// on each [`Event`].
pub trait Publisher: Send + Sync {
    fn publish(&self, event: Event) -> Result<(), PublishError>;

    /// Publish several messages. Default implementation publishes sequentially.
    fn publish_batch(&self, events: Vec<Event>) -> Result<(), PublishError> {
        for event in events {
            self.publish(event)?;
        }
        Ok(())
    }
}

impl<P: Publisher + ?Sized> Publisher for std::sync::Arc<P> {
    fn publish(&self, event: Event) -> Result<(), PublishError> {
        (**self).publish(event)
    }
}
