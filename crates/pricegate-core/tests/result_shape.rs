//! Prediction-result extraction and reply formatting vectors.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use pricegate_core::error::PricegateError;
use pricegate_core::result::{PredictReply, PredictionResult, ResultRow};
use pricegate_core::schema::validate;
use serde_json::json;

fn row(cols: &[(&str, Option<&str>)]) -> ResultRow {
    cols.iter()
        .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
        .collect()
}

#[test]
fn prefers_the_predicted_price_column() {
    let r = row(&[
        ("predicted_price", Some("42500.0")),
        ("price", Some("1.0")),
        ("manufacturer", Some("toyota")),
    ]);
    let result = PredictionResult::from_row(&r).unwrap();
    assert_eq!(result.price, 42500.0);
    assert_eq!(result.lower_bound, None);
    assert_eq!(result.upper_bound, None);
}

#[test]
fn falls_back_to_the_first_numeric_column() {
    let r = row(&[("estimate", Some("17250.5")), ("label", Some("sedan"))]);
    let result = PredictionResult::from_row(&r).unwrap();
    assert_eq!(result.price, 17250.5);
}

#[test]
fn picks_up_interval_bounds_by_suffix() {
    let r = row(&[
        ("predicted_price", Some("42500.0")),
        ("predicted_price_lower_bound", Some("40000.0")),
        ("predicted_price_upper_bound", Some("45000.0")),
    ]);
    let result = PredictionResult::from_row(&r).unwrap();
    assert_eq!(result.lower_bound, Some(40000.0));
    assert_eq!(result.upper_bound, Some(45000.0));
}

#[test]
fn no_numeric_column_is_a_shape_violation() {
    let r = row(&[("label", Some("sedan")), ("note", None)]);
    match PredictionResult::from_row(&r).unwrap_err() {
        PricegateError::UnexpectedResultShape(msg) => {
            assert!(msg.contains("label"), "{msg}");
        }
        other => panic!("expected shape error, got {other:?}"),
    }
}

#[test]
fn reply_preserves_price_exactly_and_omits_absent_bounds() {
    let features = validate(&json!({
        "year": 2015, "mileage": 60000, "make": "Toyota", "model": "Camry"
    }))
    .unwrap();
    let result = PredictionResult { price: 42500.0, lower_bound: None, upper_bound: None };

    let reply = PredictReply::new(&result, &features);
    assert_eq!(reply.price, 42500.0);

    let v = serde_json::to_value(&reply).unwrap();
    assert_eq!(v["price"], json!(42500.0));
    assert!(v.get("lower_bound").is_none());
    assert!(v.get("upper_bound").is_none());
    assert_eq!(v["inputs"]["manufacturer"], json!("toyota"));
    assert_eq!(v["inputs"]["year"], json!(2015));
}

#[test]
fn reply_carries_bounds_when_present() {
    let features = validate(&json!({
        "year": 2015, "mileage": 60000, "make": "Toyota", "model": "Camry"
    }))
    .unwrap();
    let result =
        PredictionResult { price: 42500.0, lower_bound: Some(40000.0), upper_bound: Some(45000.0) };

    let v = serde_json::to_value(PredictReply::new(&result, &features)).unwrap();
    assert_eq!(v["lower_bound"], json!(40000.0));
    assert_eq!(v["upper_bound"], json!(45000.0));
}
