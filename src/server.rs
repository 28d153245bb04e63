//! The HTTP service exposing the dispatch.
//!
//! Routes:
//!
//! * `POST /productionplan` - compute a production plan for a request document
//! * `GET /health` - liveness probe
//!
//! Each request is parsed, checked and dispatched on its own; nothing is shared between requests.
use crate::dispatch::{DispatchError, DispatchOutcome, dispatch};
use crate::input::PayloadRaw;
use crate::output::plan_rows;
use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, warn};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Response header carrying a residual that could not be corrected, in MW
pub const RESIDUAL_HEADER: &str = "x-dispatch-residual";

/// Build the router for the service
pub fn router() -> Router {
    Router::new()
        .route("/productionplan", post(production_plan))
        .route("/health", get(health))
        .fallback(not_found)
}

/// Listen on the given address and serve requests until the process is stopped
pub async fn serve(address: &str) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Could not listen on {address}"))?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router()).await?;

    Ok(())
}

/// A JSON error response
fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Handle `POST /productionplan`
pub async fn production_plan(payload: Result<Json<PayloadRaw>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => plan_response(payload),
        Err(rejection) => {
            warn!("Rejected request: {}", rejection.body_text());
            error_response(StatusCode::BAD_REQUEST, &rejection.body_text())
        }
    }
}

/// Check and dispatch a request, turning the result into a response
fn plan_response(payload: PayloadRaw) -> Response {
    info!("Received request for load: {} MW", payload.load);
    let request = match payload.into_request() {
        Ok(request) => request,
        Err(err) => {
            warn!("Invalid request: {err:#}");
            return error_response(StatusCode::BAD_REQUEST, &format!("{err:#}"));
        }
    };

    dispatch_response(dispatch(&request))
}

/// Turn the result of a dispatch into a response
fn dispatch_response(result: Result<DispatchOutcome, DispatchError>) -> Response {
    match result {
        Ok(outcome) => {
            let mut response = Json(plan_rows(outcome.plan())).into_response();
            if let Some(residual) = outcome.residual()
                && let Ok(value) = HeaderValue::from_str(&residual.value().to_string())
            {
                response.headers_mut().insert(RESIDUAL_HEADER, value);
            }
            response
        }
        Err(err @ DispatchError::InsufficientCapacity { unserved, .. }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": err.to_string(), "unserved": unserved.value() })),
        )
            .into_response(),
    }
}

/// Handle `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Handle requests to unknown routes
async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Endpoint not found")
}
