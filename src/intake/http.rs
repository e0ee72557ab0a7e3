//! Storefront-facing HTTP surface of the intake service.
//!
//! - `POST /api/bestellung`: 201 with `{lieferdatum, lieferstatus}`, or the
//!   error message as plain text. Bodies that do not decode (missing or
//!   null fields, wrong types) are answered with 400 as well.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::warn;

use super::client::FulfillmentClient;
use super::model::NewOrderRequest;
use super::workflow::OrderIntake;
use crate::error::OrderError;

pub fn router<C: FulfillmentClient + 'static>(intake: Arc<OrderIntake<C>>) -> Router {
    Router::new()
        .route("/api/bestellung", post(place_order_handler::<C>))
        .route("/health", get(|| async { Json(json!({ "ok": true })) }))
        .with_state(intake)
}

async fn place_order_handler<C: FulfillmentClient + 'static>(
    State(intake): State<Arc<OrderIntake<C>>>,
    body: Result<Json<NewOrderRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let err = OrderError::invalid(rejection.body_text());
            warn!(error = %err, "rejecting undecodable order request");
            return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
    };

    match intake.place_order(request).await {
        Ok(info) => (StatusCode::CREATED, Json(info)).into_response(),
        Err(err) => (status_for(&err), err.to_string()).into_response(),
    }
}

fn status_for(err: &OrderError) -> StatusCode {
    match err {
        OrderError::Unavailable(_) => StatusCode::BAD_GATEWAY,
        OrderError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_REQUEST,
    }
}
