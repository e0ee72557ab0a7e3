//! Catalogue and order history the fulfillment service starts with.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use super::model::FulfillmentOrder;
use crate::status::FulfillmentStatus;
use crate::store::Product;

pub fn products() -> Vec<Product> {
    vec![
        Product::new(
            "PROD-MOCK-001",
            "Mozart Kugeln Classic (10er)",
            "Breitkopf & Härtel",
            Decimal::new(599, 2),
            250,
        )
        .with_purchase_price(Decimal::new(350, 2)),
        Product::new(
            "PROD-MOCK-002",
            "Zauberflöte Partitur",
            "G. Henle Verlag",
            Decimal::new(2995, 2),
            30,
        )
        .with_purchase_price(Decimal::new(1200, 2)),
        Product::new(
            "PROD-MOCK-003",
            "Dirigentenstab Ebenholz",
            "Kunstgießerei Bonn",
            Decimal::new(4500, 2),
            50,
        )
        .with_purchase_price(Decimal::new(2500, 2)),
    ]
}

pub fn orders() -> Vec<FulfillmentOrder> {
    vec![
        FulfillmentOrder {
            order_id: "ORD-MOCK-2025-001".into(),
            customer_id: "CUST-MOCK-SALZBURG".into(),
            product_id: "PROD-MOCK-001".into(),
            status: FulfillmentStatus::Shipped,
            ship_date: at(2025, 4, 28, 16, 0),
        },
        FulfillmentOrder {
            order_id: "ORD-MOCK-2025-002".into(),
            customer_id: "CUST-MOCK-WIEN".into(),
            product_id: "PROD-MOCK-003".into(),
            status: FulfillmentStatus::Processed,
            ship_date: None,
        },
    ]
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day).and_then(|date| date.and_hms_opt(hour, minute, 0))
}
