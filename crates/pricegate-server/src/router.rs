//! Axum router wiring.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, ops, predict};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(ops::health))
        .route("/ping", get(ops::ping))
        .route("/bq_test", get(ops::bq_test))
        .route("/predict", post(predict::predict))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
