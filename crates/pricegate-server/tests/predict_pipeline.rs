//! End-to-end pipeline tests against a stubbed warehouse connection.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use async_trait::async_trait;

use pricegate_core::error::{PricegateError, Result};
use pricegate_core::query::PredictQuery;
use pricegate_core::result::ResultRow;
use pricegate_server::app_state::AppState;
use pricegate_server::config;
use pricegate_server::predict::{predict as predict_handler, run_predict};
use pricegate_server::warehouse::WarehouseConnection;

use axum::extract::State;

const CAMRY: &str = r#"{"year": 2015, "mileage": 60000, "make": "Toyota", "model": "Camry"}"#;

struct StubConnection<F>(F);

#[async_trait]
impl<F> WarehouseConnection for StubConnection<F>
where
    F: Fn(&PredictQuery) -> Result<ResultRow> + Send + Sync,
{
    async fn query_one(&self, query: &PredictQuery) -> Result<ResultRow> {
        (self.0)(query)
    }
}

fn state_with<F>(f: F) -> AppState
where
    F: Fn(&PredictQuery) -> Result<ResultRow> + Send + Sync + 'static,
{
    let cfg = config::load_from_str(
        r#"
warehouse:
  project: "used-car-pricing"
  model_table: "used-car-pricing.used_car_dataset.used_car_model_automl"
"#,
    )
    .unwrap();
    AppState::with_connection(cfg, Arc::new(StubConnection(f))).unwrap()
}

fn price_row(price: &str) -> ResultRow {
    let mut row = ResultRow::new();
    row.insert("predicted_price".into(), Some(price.into()));
    row
}

#[tokio::test]
async fn camry_scenario_returns_the_stubbed_price() {
    let state = state_with(|_| Ok(price_row("42500.0")));
    let reply = run_predict(&state, CAMRY).await.unwrap();
    assert_eq!(reply.price, 42500.0);

    let v = serde_json::to_value(&reply).unwrap();
    assert_eq!(v["price"], serde_json::json!(42500.0));
    assert!(v.get("lower_bound").is_none());
}

#[tokio::test]
async fn empty_body_is_rejected_naming_all_required_fields() {
    let state = state_with(|_| Ok(price_row("1.0")));
    let err = run_predict(&state, "{}").await.unwrap_err();
    assert_eq!(err.http_status(), 400);
    let msg = err.to_string();
    for field in ["year", "odometer", "manufacturer", "model"] {
        assert!(msg.contains(field), "missing {field} in {msg:?}");
    }
}

#[tokio::test]
async fn invalid_json_is_a_validation_error() {
    let state = state_with(|_| Ok(price_row("1.0")));
    let err = run_predict(&state, "not json").await.unwrap_err();
    assert_eq!(err.http_status(), 400);
}

#[tokio::test]
async fn the_connection_sees_a_parameterized_query() {
    let state = state_with(|q| {
        assert!(q.sql.contains("@year AS year"), "{}", q.sql);
        assert!(q.sql.contains("ML.PREDICT(MODEL `used-car-pricing.used_car_dataset.used_car_model_automl`"));
        assert!(!q.sql.contains("toyota"), "value leaked into {}", q.sql);
        assert!(q.params.iter().any(|p| p.name == "manufacturer"));
        Ok(price_row("9.0"))
    });
    run_predict(&state, CAMRY).await.unwrap();
}

async fn status_of<F>(f: F) -> u16
where
    F: Fn(&PredictQuery) -> Result<ResultRow> + Send + Sync + 'static,
{
    let state = state_with(f);
    run_predict(&state, CAMRY).await.unwrap_err().http_status()
}

#[tokio::test]
async fn warehouse_failures_map_to_gateway_statuses() {
    assert_eq!(status_of(|_| Err(PricegateError::Connectivity("down".into()))).await, 503);
    assert_eq!(status_of(|_| Err(PricegateError::Authorization("denied".into()))).await, 502);
    assert_eq!(status_of(|_| Err(PricegateError::ModelNotFound("gone".into()))).await, 502);
    assert_eq!(
        status_of(|_| Err(PricegateError::UnexpectedResultShape("two rows".into()))).await,
        500
    );
}

#[tokio::test]
async fn rejected_requests_never_reach_the_warehouse() {
    let state = state_with(|_| panic!("warehouse must not be called"));
    let err = run_predict(&state, r#"{"year": 2015}"#).await.unwrap_err();
    assert_eq!(err.http_status(), 400);
}

#[tokio::test]
async fn handler_maps_outcomes_onto_http_statuses() {
    let state = state_with(|_| Ok(price_row("42500.0")));
    let resp = predict_handler(State(state.clone()), CAMRY.to_string()).await;
    assert_eq!(resp.status(), 200);

    let resp = predict_handler(State(state), "{}".to_string()).await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn concurrent_predictions_never_lose_counter_updates() {
    let state = state_with(|_| Ok(price_row("100.0")));
    let n = 64u64;

    let mut joins = Vec::new();
    for i in 0..n {
        let st = state.clone();
        joins.push(tokio::spawn(async move {
            // Half the load is valid with varying payloads, half gets rejected.
            let body = if i % 2 == 0 {
                format!(
                    r#"{{"year": {}, "mileage": {}, "make": "Toyota", "model": "Camry"}}"#,
                    1998 + (i % 25),
                    10_000 + i * 97
                )
            } else {
                "{}".to_string()
            };
            predict_handler(State(st), body).await
        }));
    }
    for j in joins {
        j.await.unwrap();
    }

    let metrics = state.metrics();
    assert_eq!(metrics.http_requests.total(), n);
    assert_eq!(metrics.request_latency.total_count(), n);

    let rendered = metrics.render();
    assert!(
        rendered.contains(r#"pricegate_http_requests_total{outcome="ok",route="/predict"} 32"#),
        "{rendered}"
    );
    assert!(
        rendered.contains(r#"pricegate_http_requests_total{outcome="invalid",route="/predict"} 32"#),
        "{rendered}"
    );
    assert!(rendered.contains(r#"pricegate_inflight_requests{route="/predict"} 0"#), "{rendered}");
}
