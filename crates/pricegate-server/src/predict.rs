//! The request-to-prediction pipeline behind `POST /predict`.
//!
//! Received -> Validating -> {Rejected | QueryBuilt} -> Querying ->
//! {Failed(kind) | Formatted} -> Responded. Exactly one metrics update fires
//! at whichever terminal state the request reaches.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use pricegate_core::error::{PricegateError, Result};
use pricegate_core::query::build_predict_query;
use pricegate_core::result::{PredictReply, PredictionResult};
use pricegate_core::schema;

use crate::app_state::AppState;
use crate::obs::RequestTimer;
use crate::reply::{error_response, log_failure};

/// The body is taken raw rather than through the JSON extractor so malformed
/// payloads still flow through the pipeline's own validation error (and its
/// metrics outcome) instead of the framework's rejection.
pub async fn predict(State(state): State<AppState>, body: String) -> Response {
    let timer = RequestTimer::start(state.metrics(), "/predict");
    match run_predict(&state, &body).await {
        Ok(reply) => {
            timer.finish("ok");
            (StatusCode::OK, Json(reply)).into_response()
        }
        Err(err) => {
            log_failure("/predict", &err);
            let resp = error_response(&err);
            timer.finish(err.outcome());
            resp
        }
    }
}

/// Validate -> build -> query -> format, over injected state. Integration
/// tests drive this directly with a stubbed connection.
pub async fn run_predict(state: &AppState, body: &str) -> Result<PredictReply> {
    let payload: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        PricegateError::Validation { problems: vec![format!("body: invalid json: {e}")] }
    })?;

    let features = schema::validate(&payload)?;
    tracing::debug!(route = "/predict", ?features, "request validated");

    let query = build_predict_query(state.model(), &features);
    let row = state.warehouse().query_one(&query).await?;

    let result = PredictionResult::from_row(&row)?;
    tracing::info!(route = "/predict", price = result.price, "prediction served");
    Ok(PredictReply::new(&result, &features))
}
