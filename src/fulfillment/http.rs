//! Admin HTTP surface of the fulfillment service.
//!
//! - `GET /api/status/:id?status=SHIPPED`: run the status update workflow.
//! - everything from [`microsvc::router`]: `/health` and `POST /:command`.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use super::{update_status, FulfillmentState};
use crate::microsvc::{self, Service};

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

pub fn router(service: Arc<Service<FulfillmentState>>) -> Router {
    Router::new()
        .route("/api/status/:id", get(status_handler))
        .with_state(service.clone())
        .merge(microsvc::router(service))
}

async fn status_handler(
    State(service): State<Arc<Service<FulfillmentState>>>,
    Path(order_id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Response {
    let Some(status) = query.status else {
        return (StatusCode::BAD_REQUEST, "missing required parameter: status").into_response();
    };

    match update_status(service.state(), &order_id, &status) {
        Ok(_) => (
            StatusCode::OK,
            format!("Status update sent for order ID: {} with status: {}", order_id, status),
        )
            .into_response(),
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}
