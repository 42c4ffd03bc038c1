//! Operational HTTP endpoints.
//!
//! - `/health`  : liveness, no external dependency
//! - `/ping`    : trivial echo
//! - `/bq_test` : warehouse reachability + credential probe
//! - `/metrics` : Prometheus text format

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::app_state::AppState;
use crate::obs::RequestTimer;
use crate::reply::{error_response, log_failure};

pub async fn health(State(state): State<AppState>) -> Response {
    let timer = RequestTimer::start(state.metrics(), "/health");
    let resp = (
        StatusCode::OK,
        Json(json!({ "status": "ok", "model": state.model().as_str() })),
    )
        .into_response();
    timer.finish("ok");
    resp
}

pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok", "message": "pong" })))
}

pub async fn bq_test(State(state): State<AppState>) -> Response {
    let timer = RequestTimer::start(state.metrics(), "/bq_test");
    match state.warehouse().probe().await {
        Ok(row) => {
            timer.finish("ok");
            (StatusCode::OK, Json(json!({ "status": "ok", "row": row }))).into_response()
        }
        Err(err) => {
            log_failure("/bq_test", &err);
            let resp = error_response(&err);
            timer.finish(err.outcome());
            resp
        }
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
