//! Intake-side records and wire messages.
//!
//! Field names on the wire follow the storefront's German vocabulary
//! (`kundenId`, `menge`, `lieferdatum`, ...).

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::OrderError;
use crate::status::DeliveryStatus;
use crate::store::Record;

/// Body of `POST /api/bestellung`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRequest {
    pub kunden_id: String,
    pub email: String,
    pub adresse: String,
    pub produkt_id: String,
    pub menge: i64,
    pub zahlungsmethode: String,
}

impl NewOrderRequest {
    /// Check every field and return the quantity as an unsigned count.
    pub fn validate(&self) -> Result<u32, OrderError> {
        let required = [
            ("kundenId", &self.kunden_id),
            ("email", &self.email),
            ("adresse", &self.adresse),
            ("produktId", &self.produkt_id),
            ("zahlungsmethode", &self.zahlungsmethode),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(OrderError::invalid(format!("{} must not be empty", field)));
        }

        if !is_valid_email(&self.email) {
            return Err(OrderError::invalid(format!(
                "email is not a valid address: {}",
                self.email
            )));
        }

        u32::try_from(self.menge)
            .ok()
            .filter(|quantity| *quantity >= 1)
            .ok_or_else(|| OrderError::invalid(format!("menge must be at least 1, got {}", self.menge)))
    }
}

/// `local@domain.tld`, no whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// The storefront's copy of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeOrder {
    /// Id assigned by the fulfillment service.
    pub order_id: String,
    pub customer_id: String,
    pub email: String,
    pub address: String,
    pub product_id: String,
    pub quantity: u32,
    pub ordered_at: NaiveDateTime,
    pub delivery_status: DeliveryStatus,
    pub delivery_date: Option<NaiveDateTime>,
    pub payment_method: String,
}

impl Record for IntakeOrder {
    const COLLECTION: &'static str = "intake_orders";

    fn id(&self) -> &str {
        &self.order_id
    }
}

/// What the caller of the intake workflow gets back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryInfo {
    pub lieferdatum: NaiveDateTime,
    pub lieferstatus: DeliveryStatus,
}

/// Order summary for the CRM exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmOrderEvent {
    pub bestell_id: String,
    pub kunden_id: String,
    pub bestelldatum: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub gesamtbetrag: Decimal,
    pub status: String,
    pub email: String,
    pub adress_zeichenkette: String,
}

/// Status message as received from the storefront exchange.
///
/// Both fields are optional so that malformed messages can be logged and
/// dropped rather than failing to decode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontStatusMessage {
    #[serde(default)]
    pub bestell_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
