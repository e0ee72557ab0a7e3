//! Message broker abstractions.
//!
//! Both services talk to downstream systems through exchanges: the intake
//! side publishes CRM updates, the fulfillment side publishes storefront
//! status changes that the intake side consumes.
//!
//! ```text
//! ┌──────────────┐  publish   ┌───────────────────────────┐  poll/ack/nack  ┌────────────┐
//! │ BestEffort<P>│ ─────────▶ │ exchange (InMemoryQueue)  │ ──────────────▶ │ Subscriber │
//! │ logs + drops │            │ append-only log per name  │                 │ listener   │
//! └──────────────┘            └───────────────────────────┘                 └────────────┘
//! ```
//!
//! Any broker client can stand in for [`InMemoryQueue`] by implementing
//! [`Publisher`] and [`Subscriber`].

mod best_effort;
mod in_memory_queue;
mod publisher;
mod subscriber;

pub use best_effort::BestEffort;
pub use in_memory_queue::InMemoryQueue;
pub use publisher::{Event, PublishError, Publisher};
pub use subscriber::{Subscribable, Subscriber};
