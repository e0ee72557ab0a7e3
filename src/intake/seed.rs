//! Catalogue and order history the intake service starts with.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use super::model::IntakeOrder;
use crate::status::DeliveryStatus;
use crate::store::Product;

pub fn products() -> Vec<Product> {
    vec![
        Product::new(
            "PROD-MOCK-001",
            "Mozart Kugeln Classic (10er)",
            "Süßwaren",
            Decimal::new(599, 2),
            250,
        ),
        Product::new(
            "PROD-MOCK-002",
            "Zauberflöte Partitur",
            "Noten",
            Decimal::new(2995, 2),
            30,
        ),
        Product::new(
            "PROD-MOCK-003",
            "Dirigentenstab Ebenholz",
            "Zubehör",
            Decimal::new(4500, 2),
            50,
        ),
    ]
}

pub fn orders() -> Vec<IntakeOrder> {
    vec![
        IntakeOrder {
            order_id: "ORD-MOCK-2025-001".into(),
            customer_id: "CUST-MOCK-SALZBURG".into(),
            email: "info@mozarteum.at".into(),
            address: "Mirabellplatz 1, 5020 Salzburg".into(),
            product_id: "PROD-MOCK-001".into(),
            quantity: 20,
            ordered_at: at(2025, 4, 15, 10, 30).unwrap_or_default(),
            delivery_status: DeliveryStatus::Delivered,
            delivery_date: at(2025, 4, 18, 14, 0),
            payment_method: "Rechnung".into(),
        },
        IntakeOrder {
            order_id: "ORD-MOCK-2025-002".into(),
            customer_id: "CUST-MOCK-WIEN".into(),
            email: "tickets@staatsoper.at".into(),
            address: "Opernring 2, 1010 Wien".into(),
            product_id: "PROD-MOCK-002".into(),
            quantity: 5,
            ordered_at: at(2025, 4, 28, 9, 0).unwrap_or_default(),
            delivery_status: DeliveryStatus::Processing,
            delivery_date: None,
            payment_method: "Kreditkarte".into(),
        },
    ]
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day).and_then(|date| date.and_hms_opt(hour, minute, 0))
}
