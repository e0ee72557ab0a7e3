//! HTTP transport: maps HTTP requests to command dispatch.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `POST /:command`: dispatch a command with the JSON body as input.
//! - `GET /health`: `{ "ok": true, "commands": [...] }`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::error::HandlerError;
use super::service::Service;

/// Build an axum `Router` that dispatches commands via the given service.
pub fn router<S: Send + Sync + 'static>(service: Arc<Service<S>>) -> Router {
    Router::new()
        .route("/health", get(health_handler::<S>))
        .route("/:command", post(command_handler::<S>))
        .with_state(service)
}

async fn health_handler<S: Send + Sync + 'static>(
    State(service): State<Arc<Service<S>>>,
) -> impl IntoResponse {
    Json(json!({ "ok": true, "commands": service.commands() }))
}

async fn command_handler<S: Send + Sync + 'static>(
    State(service): State<Arc<Service<S>>>,
    Path(command): Path<String>,
    Json(input): Json<Value>,
) -> Response {
    match service.dispatch(&command, input) {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// JSON error body with the status code from [`HandlerError::status_code`].
pub fn error_response(err: &HandlerError) -> Response {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
