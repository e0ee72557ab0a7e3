//! In-memory exchange for tests and single-process deployments.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use tracing::warn;

use super::{Event, PublishError, Publisher, Subscribable, Subscriber};

/// A named in-memory exchange.
///
/// Messages go into a log shared by every clone. Each subscriber created
/// through [`new_subscriber`](Subscribable::new_subscriber) keeps its own read
/// position, so every consumer sees every message. Nacked messages are
/// recorded and never redelivered.
///
/// [`new`](Self::new) keeps everything, which suits tests that inspect the
/// log afterwards. Long-running processes use [`bounded`](Self::bounded): the
/// log and the ack/nack records then hold at most `retention` entries, the
/// oldest are evicted first, and a subscriber that falls behind the eviction
/// point skips ahead.
///
/// ```
/// use orderflow::bus::{Event, InMemoryQueue, Publisher, Subscriber};
///
/// let exchange = InMemoryQueue::new("crm.direct.exchange");
/// exchange.publish(Event::with_string_payload("evt-1", "crm.updates.routingkey", "{}")).unwrap();
///
/// let event = exchange.poll(100).unwrap().unwrap();
/// assert_eq!(event.routing_key, "crm.updates.routingkey");
/// ```
#[derive(Clone)]
pub struct InMemoryQueue {
    exchange: Arc<str>,
    retention: Option<usize>,
    log: Arc<RwLock<Log>>,
    /// Absolute offset of the next message to read.
    position: Arc<Mutex<usize>>,
    acked: Arc<Mutex<VecDeque<String>>>,
    nacked: Arc<Mutex<VecDeque<(String, String)>>>,
}

#[derive(Default)]
struct Log {
    /// Absolute offset of `events[0]`; equals the number of evicted messages.
    base: usize,
    events: VecDeque<Event>,
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new("default")
    }
}

impl InMemoryQueue {
    /// An exchange that keeps every message.
    pub fn new(exchange: impl Into<String>) -> Self {
        Self::with_retention(exchange, None)
    }

    /// An exchange that keeps at most `retention` messages (at least one).
    pub fn bounded(exchange: impl Into<String>, retention: usize) -> Self {
        Self::with_retention(exchange, Some(retention.max(1)))
    }

    fn with_retention(exchange: impl Into<String>, retention: Option<usize>) -> Self {
        Self {
            exchange: Arc::from(exchange.into()),
            retention,
            log: Arc::new(RwLock::new(Log::default())),
            position: Arc::new(Mutex::new(0)),
            acked: Arc::new(Mutex::new(VecDeque::new())),
            nacked: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Messages currently held in the log.
    pub fn events(&self) -> Vec<Event> {
        self.read_log().events.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read_log().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_log().events.is_empty()
    }

    /// Number of messages dropped to stay within the retention limit.
    pub fn evicted(&self) -> usize {
        self.read_log().base
    }

    /// All held messages published with `routing_key`.
    pub fn find_all_by_routing_key(&self, routing_key: &str) -> Vec<Event> {
        self.read_log()
            .events
            .iter()
            .filter(|e| e.routing_key == routing_key)
            .cloned()
            .collect()
    }

    /// Decode every held payload, skipping any that do not match `T`.
    pub fn decoded<T: DeserializeOwned>(&self) -> Vec<T> {
        self.read_log()
            .events
            .iter()
            .filter_map(|e| e.decode().ok())
            .collect()
    }

    pub fn current_position(&self) -> usize {
        *lock(&self.position)
    }

    pub fn acknowledged(&self) -> Vec<String> {
        lock(&self.acked).iter().cloned().collect()
    }

    /// Rejected message ids with their reasons.
    pub fn rejected(&self) -> Vec<(String, String)> {
        lock(&self.nacked).iter().cloned().collect()
    }

    fn append(&self, events: impl IntoIterator<Item = Event>) {
        let mut log = self.write_log();
        log.events.extend(events);
        if let Some(retention) = self.retention {
            while log.events.len() > retention {
                log.events.pop_front();
                log.base += 1;
            }
        }
    }

    fn record<T>(&self, records: &Mutex<VecDeque<T>>, entry: T) {
        let mut records = lock(records);
        records.push_back(entry);
        if let Some(retention) = self.retention {
            while records.len() > retention {
                records.pop_front();
            }
        }
    }

    fn read_log(&self) -> RwLockReadGuard<'_, Log> {
        self.log.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_log(&self) -> RwLockWriteGuard<'_, Log> {
        self.log.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Publisher for InMemoryQueue {
    fn publish(&self, event: Event) -> Result<(), PublishError> {
        self.append([event]);
        Ok(())
    }

    fn publish_batch(&self, events: Vec<Event>) -> Result<(), PublishError> {
        self.append(events);
        Ok(())
    }
}

impl Subscriber for InMemoryQueue {
    fn poll(&self, timeout_ms: u64) -> Result<Option<Event>, PublishError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            {
                let log = self.read_log();
                let mut pos = lock(&self.position);

                if *pos < log.base {
                    warn!(
                        exchange = %self.exchange,
                        skipped = log.base - *pos,
                        "subscriber fell behind retention, skipping evicted messages"
                    );
                    *pos = log.base;
                }

                if let Some(event) = log.events.get(*pos - log.base) {
                    let event = event.clone();
                    *pos += 1;
                    return Ok(Some(event));
                }
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }

            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn ack(&self, event_id: &str) -> Result<(), PublishError> {
        self.record(&self.acked, event_id.to_string());
        Ok(())
    }

    fn nack(&self, event_id: &str, reason: &str) -> Result<(), PublishError> {
        self.record(&self.nacked, (event_id.to_string(), reason.to_string()));
        Ok(())
    }
}

impl Subscribable for InMemoryQueue {
    fn new_subscriber(&self) -> Self {
        Self {
            exchange: Arc::clone(&self.exchange),
            retention: self.retention,
            log: Arc::clone(&self.log),
            position: Arc::new(Mutex::new(0)),
            acked: Arc::new(Mutex::new(VecDeque::new())),
            nacked: Arc::new(Mutex::new(VecDeque::new())),
        }
    }
}
