use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use orderflow::bus::{Event, Publisher, Subscribable};
use orderflow::fulfillment::{update_status, StorefrontStatusEvent};
use orderflow::intake::{self, CrmOrderEvent};
use orderflow::status::{DeliveryStatus, FulfillmentStatus};
use orderflow::store::OrderStore;
use orderflow::OrderError;
use rust_decimal::Decimal;

use crate::support::{expected_ship_date, order_request, wait_until, Harness, STOREFRONT_ROUTING_KEY};

const POLL: Duration = Duration::from_millis(10);

#[tokio::test]
async fn order_is_created_recorded_and_reported() {
    let h = Harness::new(10);

    let info = h.intake.place_order(order_request(3)).await.unwrap();

    assert_eq!(info.lieferdatum, expected_ship_date());
    assert_eq!(info.lieferstatus, DeliveryStatus::Processing);
    assert_eq!(h.fulfillment_stock(), 7);
    assert_eq!(h.intake_stock(), 10);

    let remote = h.fulfillment_orders.all().unwrap();
    assert_eq!(remote.len(), 1);
    assert_eq!(remote[0].status, FulfillmentStatus::Processed);
    assert_eq!(remote[0].ship_date, Some(expected_ship_date()));

    let local = h.intake_orders.get(&remote[0].order_id).unwrap().unwrap();
    assert_eq!(local.quantity, 3);
    assert_eq!(local.delivery_status, DeliveryStatus::Processing);
    assert_eq!(local.delivery_date, Some(expected_ship_date()));
    assert_eq!(local.payment_method, "Rechnung");

    let events: Vec<CrmOrderEvent> = h.crm.decoded();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].bestell_id, remote[0].order_id);
    assert_eq!(events[0].gesamtbetrag, Decimal::new(1500, 2));
    assert_eq!(events[0].status, "Processing");
    assert_eq!(events[0].bestelldatum, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
}

#[tokio::test]
async fn insufficient_stock_leaves_everything_untouched() {
    let h = Harness::new(2);

    let err = h.intake.place_order(order_request(5)).await.unwrap_err();

    assert!(matches!(err, OrderError::FailedPrecondition(_)), "{err:?}");
    assert_eq!(h.fulfillment_stock(), 2);
    assert!(h.fulfillment_orders.is_empty().unwrap());
    assert!(h.intake_orders.is_empty().unwrap());
    assert!(h.crm.is_empty());
}

#[tokio::test]
async fn shipped_status_reaches_the_intake_record() {
    let h = Harness::new(10);
    h.intake.place_order(order_request(1)).await.unwrap();
    let order_id = h.fulfillment_orders.all().unwrap()[0].order_id.clone();

    let subscriber = h.storefront.new_subscriber();
    let probe = subscriber.clone();
    let listener = intake::spawn_listener(
        Arc::new(h.intake_orders.clone()),
        STOREFRONT_ROUTING_KEY,
        subscriber,
        POLL,
    );

    update_status(h.fulfillment_state(), &order_id, "shipped").unwrap();

    let orders = h.intake_orders.clone();
    let id = order_id.clone();
    assert!(wait_until(Duration::from_secs(2), move || {
        orders
            .get(&id)
            .unwrap()
            .is_some_and(|o| o.delivery_status == DeliveryStatus::Shipped)
    }));

    let stats = listener.stop();
    assert_eq!(stats.handled, 1);
    assert_eq!(probe.acknowledged().len(), 1);
    assert_eq!(
        h.fulfillment_orders.get(&order_id).unwrap().unwrap().status,
        FulfillmentStatus::Shipped
    );
}

#[tokio::test]
async fn cancelled_is_seen_as_delivered_by_the_storefront() {
    let h = Harness::new(10);
    h.intake.place_order(order_request(1)).await.unwrap();
    let order_id = h.fulfillment_orders.all().unwrap()[0].order_id.clone();

    let listener = intake::spawn_listener(
        Arc::new(h.intake_orders.clone()),
        STOREFRONT_ROUTING_KEY,
        h.storefront.new_subscriber(),
        POLL,
    );

    update_status(h.fulfillment_state(), &order_id, "CANCELLED").unwrap();

    let published: Vec<StorefrontStatusEvent> = h.storefront.decoded();
    assert_eq!(published[0].status, DeliveryStatus::Delivered);

    let orders = h.intake_orders.clone();
    assert!(wait_until(Duration::from_secs(2), move || {
        orders
            .get(&order_id)
            .unwrap()
            .is_some_and(|o| o.delivery_status == DeliveryStatus::Delivered)
    }));
    listener.stop();
}

#[tokio::test]
async fn redelivered_status_message_is_harmless() {
    let h = Harness::new(10);
    h.intake.place_order(order_request(1)).await.unwrap();
    let order_id = h.fulfillment_orders.all().unwrap()[0].order_id.clone();

    update_status(h.fulfillment_state(), &order_id, "SHIPPED").unwrap();
    let duplicate = h.storefront.events()[0].clone();
    h.storefront.publish(duplicate).unwrap();

    let subscriber = h.storefront.new_subscriber();
    let probe = subscriber.clone();
    let listener = intake::spawn_listener(
        Arc::new(h.intake_orders.clone()),
        STOREFRONT_ROUTING_KEY,
        subscriber,
        POLL,
    );

    assert!(wait_until(Duration::from_secs(2), || probe.acknowledged().len() == 2));
    let stats = listener.stop();

    assert_eq!(stats.handled, 2);
    assert_eq!(stats.failed, 0);
    let order = h.intake_orders.get(&order_id).unwrap().unwrap();
    assert_eq!(order.delivery_status, DeliveryStatus::Shipped);
    assert_eq!(order.quantity, 1);
}

#[tokio::test]
async fn listener_drops_messages_it_cannot_apply() {
    let h = Harness::new(10);

    let subscriber = h.storefront.new_subscriber();
    let probe = subscriber.clone();
    let listener = intake::spawn_listener(
        Arc::new(h.intake_orders.clone()),
        STOREFRONT_ROUTING_KEY,
        subscriber,
        POLL,
    );

    h.storefront
        .publish(Event::with_string_payload("m-1", STOREFRONT_ROUTING_KEY, r#"{"status":"SHIPPED"}"#))
        .unwrap();
    h.storefront
        .publish(Event::with_string_payload(
            "m-2",
            STOREFRONT_ROUTING_KEY,
            r#"{"bestellId":"ORD-404","status":"SHIPPED"}"#,
        ))
        .unwrap();

    assert!(wait_until(Duration::from_secs(2), || probe.rejected().len() == 2));
    let stats = listener.stop();

    assert_eq!(stats.failed, 2);
    assert_eq!(stats.handled, 0);
    let rejected: Vec<String> = probe.rejected().into_iter().map(|(id, _)| id).collect();
    assert_eq!(rejected, vec!["m-1".to_string(), "m-2".to_string()]);
}

#[tokio::test]
async fn unknown_status_is_refused_before_anything_is_published() {
    let h = Harness::new(10);
    h.intake.place_order(order_request(1)).await.unwrap();
    let order_id = h.fulfillment_orders.all().unwrap()[0].order_id.clone();

    let err = update_status(h.fulfillment_state(), &order_id, "lost").unwrap_err();

    assert!(matches!(err, OrderError::InvalidArgument(_)));
    assert!(h.storefront.is_empty());
    assert_eq!(
        h.fulfillment_orders.get(&order_id).unwrap().unwrap().status,
        FulfillmentStatus::Processed
    );
}
