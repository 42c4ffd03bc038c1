//! Shared HTTP reply helpers: the public error shape and failure logging.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use pricegate_core::error::PricegateError;

/// Map a pipeline error onto the public HTTP error shape.
pub fn error_response(err: &PricegateError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.to_string(),
            "code": err.client_code().as_str(),
        })),
    )
        .into_response()
}

/// Log a request-path failure with route and kind, at a severity matching the
/// taxonomy: rejected input is routine, warehouse trouble is a warning, and a
/// result-shape violation means the model contract broke.
pub fn log_failure(route: &'static str, err: &PricegateError) {
    let kind = err.client_code().as_str();
    match err {
        PricegateError::Validation { .. } => {
            tracing::info!(route, kind, %err, "request rejected");
        }
        PricegateError::UnexpectedResultShape(_) => {
            tracing::error!(route, kind, %err, "model contract violated");
        }
        _ => {
            tracing::warn!(route, kind, %err, "warehouse call failed");
        }
    }
}
