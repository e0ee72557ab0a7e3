//! Service - command handler registry, dispatch, and the broker transport loop.
//!
//! `Service<S>` holds the service state and a set of named command handlers.
//! Each handler receives a `Context<S>` and returns `Result<Value, HandlerError>`.

use std::collections::HashMap;
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::context::Context;
use super::error::HandlerError;
use crate::bus::{Event, Subscriber};

type Guard<S> = Box<dyn Fn(&Context<S>) -> bool + Send + Sync>;
type Handle<S> = Box<dyn Fn(&Context<S>) -> Result<Value, HandlerError> + Send + Sync>;

struct CommandHandler<S> {
    guard: Option<Guard<S>>,
    handle: Handle<S>,
}

/// A microservice that routes commands to handler functions.
pub struct Service<S> {
    state: S,
    handlers: HashMap<String, CommandHandler<S>>,
}

impl<S: Send + Sync + 'static> Service<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            handlers: HashMap::new(),
        }
    }

    /// Register a command handler. Returns `self` for chaining.
    pub fn command<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&Context<S>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            CommandHandler {
                guard: None,
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Register a command handler behind a guard.
    ///
    /// If the guard returns `false` the command fails with
    /// [`HandlerError::GuardRejected`] and the handler never runs.
    pub fn command_guarded<G, F>(mut self, name: &str, guard: G, handler: F) -> Self
    where
        G: Fn(&Context<S>) -> bool + Send + Sync + 'static,
        F: Fn(&Context<S>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            CommandHandler {
                guard: Some(Box::new(guard)),
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Dispatch a command by name.
    pub fn dispatch(&self, command: &str, input: Value) -> Result<Value, HandlerError> {
        let handler = self
            .handlers
            .get(command)
            .ok_or_else(|| HandlerError::UnknownCommand(command.to_string()))?;

        let ctx = Context::new(command, input, &self.state);

        if let Some(guard) = &handler.guard {
            if !guard(&ctx) {
                return Err(HandlerError::GuardRejected(command.to_string()));
            }
        }

        (handler.handle)(&ctx)
    }

    /// Dispatch a broker message as a command: the routing key names the
    /// command and the JSON payload is the input.
    pub fn dispatch_event(&self, event: &Event) -> Result<Value, HandlerError> {
        let input = serde_json::from_slice::<Value>(&event.payload)?;
        self.dispatch(&event.routing_key, input)
    }

    /// Registered command names, sorted.
    pub fn commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

// =============================================================================
// Broker transport
// =============================================================================

/// Counters reported by a transport thread when it stops.
#[derive(Debug, Default, Clone)]
pub struct TransportStats {
    /// Messages handled successfully (acked).
    pub handled: usize,
    /// Messages whose handler failed (nacked).
    pub failed: usize,
    /// Poll cycles completed.
    pub polls: usize,
}

/// Handle to a background transport thread. Drop or call `stop()` to shut down.
pub struct TransportHandle {
    stop_tx: mpsc::Sender<()>,
    handle: Option<JoinHandle<TransportStats>>,
}

impl TransportHandle {
    /// Stop the transport and wait for it to finish.
    pub fn stop(mut self) -> TransportStats {
        let _ = self.stop_tx.send(());
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or_default(),
            None => TransportStats::default(),
        }
    }

    /// Signal stop without waiting.
    pub fn signal_stop(&self) {
        let _ = self.stop_tx.send(());
    }
}

impl Drop for TransportHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}

/// Consume messages from `subscriber` and dispatch each one to `service`.
///
/// Spawns a background thread that polls sequentially. Messages whose handler
/// succeeds are acked; failures are nacked with the error text and left to
/// the broker's redelivery policy.
///
/// ```ignore
/// let exchange = InMemoryQueue::new("ecommerce.direct.exchange");
/// let handle = microsvc::subscribe(service.clone(), exchange.new_subscriber(), Duration::from_millis(50));
/// // ...
/// let stats = handle.stop();
/// ```
pub fn subscribe<S, Sub>(
    service: Arc<Service<S>>,
    subscriber: Sub,
    poll_interval: Duration,
) -> TransportHandle
where
    S: Send + Sync + 'static,
    Sub: Subscriber + 'static,
{
    let (stop_tx, stop_rx) = mpsc::channel();
    let timeout_ms = u64::try_from(poll_interval.as_millis()).unwrap_or(u64::MAX);

    let handle = thread::spawn(move || {
        let mut stats = TransportStats::default();

        loop {
            match stop_rx.try_recv() {
                Ok(()) | Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => {}
            }

            stats.polls += 1;

            match subscriber.poll(timeout_ms) {
                Ok(Some(event)) => match service.dispatch_event(&event) {
                    Ok(_) => {
                        debug!(message_id = %event.id, routing_key = %event.routing_key, "message handled");
                        let _ = subscriber.ack(&event.id);
                        stats.handled += 1;
                    }
                    Err(err) => {
                        let _ = subscriber.nack(&event.id, &err.to_string());
                        stats.failed += 1;
                    }
                },
                Ok(None) => {}
                Err(err) => warn!(error = %err, "subscriber poll failed"),
            }
        }

        stats
    });

    TransportHandle {
        stop_tx,
        handle: Some(handle),
    }
}
