//! Configuration for the two services.
//!
//! Loads configuration from environment variables with defaults suitable for
//! running both services in one process on a developer machine.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::OrderError;

/// Process configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub intake: IntakeConfig,
    pub fulfillment: FulfillmentConfig,
    pub broker: BrokerConfig,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_level: String,
}

/// Storefront-facing order intake service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Bind address of `POST /api/bestellung`.
    pub http_addr: String,
    /// Endpoint the intake side dials for the fulfillment RPC.
    pub fulfillment_endpoint: String,
    /// Upper bound on one fulfillment RPC round trip, in milliseconds.
    pub fulfillment_timeout_ms: u64,
    pub inventory_mode: InventoryMode,
    /// Poll interval of the storefront status listener, in milliseconds.
    pub listener_poll_ms: u64,
}

/// ERP / inventory fulfillment service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulfillmentConfig {
    /// Bind address of the admin HTTP routes.
    pub http_addr: String,
    /// Bind address of the gRPC command service.
    pub grpc_addr: String,
}

/// Exchange and routing key names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    pub crm_exchange: String,
    pub crm_routing_key: String,
    pub ecommerce_exchange: String,
    pub ecommerce_status_routing_key: String,
    /// Messages each in-process exchange keeps before evicting the oldest.
    pub retention: usize,
}

/// Which service owns stock on the intake path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryMode {
    /// Fulfillment is the only stock authority. Intake reads prices only.
    #[default]
    Authoritative,
    /// Intake also decrements its own copy before calling fulfillment.
    Mirrored,
}

impl FromStr for InventoryMode {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "authoritative" => Ok(InventoryMode::Authoritative),
            "mirrored" => Ok(InventoryMode::Mirrored),
            other => Err(OrderError::invalid(format!("unknown inventory mode: {}", other))),
        }
    }
}

impl fmt::Display for InventoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryMode::Authoritative => f.write_str("authoritative"),
            InventoryMode::Mirrored => f.write_str("mirrored"),
        }
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            crm_exchange: "crm.direct.exchange".to_string(),
            crm_routing_key: "crm.updates.routingkey".to_string(),
            ecommerce_exchange: "ecommerce.direct.exchange".to_string(),
            ecommerce_status_routing_key: "ecommerce.status.routingkey".to_string(),
            retention: 10_000,
        }
    }
}

impl IntakeConfig {
    pub fn fulfillment_timeout(&self) -> Duration {
        Duration::from_millis(self.fulfillment_timeout_ms)
    }

    pub fn listener_poll_interval(&self) -> Duration {
        Duration::from_millis(self.listener_poll_ms)
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable variables fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let broker = BrokerConfig::default();

        Self {
            intake: IntakeConfig {
                http_addr: lookup("INTAKE_HTTP_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
                fulfillment_endpoint: lookup("FULFILLMENT_GRPC_ENDPOINT")
                    .unwrap_or_else(|| "http://127.0.0.1:9090".to_string()),
                fulfillment_timeout_ms: lookup("FULFILLMENT_TIMEOUT_MS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5000),
                inventory_mode: lookup("INTAKE_INVENTORY_MODE")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_default(),
                listener_poll_ms: lookup("LISTENER_POLL_MS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(50),
            },
            fulfillment: FulfillmentConfig {
                http_addr: lookup("FULFILLMENT_HTTP_ADDR")
                    .unwrap_or_else(|| "0.0.0.0:8081".to_string()),
                grpc_addr: lookup("FULFILLMENT_GRPC_ADDR")
                    .unwrap_or_else(|| "127.0.0.1:9090".to_string()),
            },
            broker: BrokerConfig {
                crm_exchange: lookup("CRM_EXCHANGE").unwrap_or(broker.crm_exchange),
                crm_routing_key: lookup("CRM_ROUTING_KEY").unwrap_or(broker.crm_routing_key),
                ecommerce_exchange: lookup("ECOMMERCE_EXCHANGE")
                    .unwrap_or(broker.ecommerce_exchange),
                ecommerce_status_routing_key: lookup("ECOMMERCE_STATUS_ROUTING_KEY")
                    .unwrap_or(broker.ecommerce_status_routing_key),
                retention: lookup("BROKER_RETENTION")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(broker.retention),
            },
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }
}
