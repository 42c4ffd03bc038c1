//! ML.PREDICT query construction vectors.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use pricegate_core::query::{build_predict_query, probe_query, ModelRef};
use pricegate_core::schema::{validate, FeatureValue};
use serde_json::json;

fn camry_features() -> pricegate_core::schema::FeatureVector {
    validate(&json!({
        "year": 2015, "mileage": 60000, "make": "Toyota", "model": "Camry"
    }))
    .unwrap()
}

#[test]
fn model_ref_accepts_qualified_names_only() {
    assert!(ModelRef::parse("used-car-pricing.used_car_dataset.used_car_model_automl").is_ok());
    assert!(ModelRef::parse("").is_err());
    assert!(ModelRef::parse("dataset.model").is_err());
    assert!(ModelRef::parse("a..c").is_err());
    assert!(ModelRef::parse("p.d.m.extra").is_err());
}

#[test]
fn model_ref_rejects_quoting_characters() {
    assert!(ModelRef::parse("proj.dataset.model` ; DROP TABLE x").is_err());
    assert!(ModelRef::parse("proj.dataset.mo del").is_err());
    assert!(ModelRef::parse("proj.data'set.model").is_err());
}

#[test]
fn every_feature_binds_as_a_named_parameter() {
    let model = ModelRef::parse("p.d.m").unwrap();
    let q = build_predict_query(&model, &camry_features());

    // All seven features are bound, defaults included.
    assert_eq!(q.params.len(), 7);
    for p in &q.params {
        assert!(
            q.sql.contains(&format!("@{} AS {}", p.name, p.name)),
            "missing binding for {} in {}",
            p.name,
            q.sql
        );
    }
}

#[test]
fn feature_values_never_appear_in_the_sql_text() {
    let model = ModelRef::parse("p.d.m").unwrap();
    let q = build_predict_query(&model, &camry_features());

    for needle in ["2015", "60000", "toyota", "camry", "unknown"] {
        assert!(!q.sql.contains(needle), "value {needle} leaked into {}", q.sql);
    }
    assert!(q.sql.starts_with("SELECT * FROM ML.PREDICT(MODEL `p.d.m`"));
}

#[test]
fn parameter_types_follow_the_feature_kinds() {
    let model = ModelRef::parse("p.d.m").unwrap();
    let q = build_predict_query(&model, &camry_features());

    let type_of = |name: &str| {
        q.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.sql_type())
            .unwrap()
    };
    assert_eq!(type_of("year"), "INT64");
    assert_eq!(type_of("odometer"), "FLOAT64");
    assert_eq!(type_of("manufacturer"), "STRING");

    let year = q.params.iter().find(|p| p.name == "year").unwrap();
    assert_eq!(year.value, FeatureValue::Int(2015));
}

#[test]
fn probe_query_is_parameterless() {
    let q = probe_query();
    assert_eq!(q.sql, "SELECT 1 AS ok");
    assert!(q.params.is_empty());
}
