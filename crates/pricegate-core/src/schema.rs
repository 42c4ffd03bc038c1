//! Prediction request schema.
//!
//! The feature set the model was trained on is declared as a table; the
//! validator checks an incoming JSON payload against it and produces a typed
//! `FeatureVector`. Unknown fields are rejected, so the validated mapping is
//! always exactly the declared feature set.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{PricegateError, Result};

/// Value kind a feature must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Float,
    Text,
    /// Cylinder count; numbers and digit-prefixed strings normalize to
    /// `"<n> cylinders"`.
    Cylinders,
}

/// One feature the model expects.
#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
    pub required: bool,
}

/// Feature table for the used-car pricing model. Aliases accept the common
/// client spellings (`mileage`, `make`); the canonical names are the model's
/// training columns.
pub const CAR_PRICE_FEATURES: &[FieldSpec] = &[
    FieldSpec { name: "year", aliases: &[], kind: FieldKind::Int, required: true },
    FieldSpec { name: "odometer", aliases: &["mileage"], kind: FieldKind::Float, required: true },
    FieldSpec { name: "manufacturer", aliases: &["make"], kind: FieldKind::Text, required: true },
    FieldSpec { name: "model", aliases: &[], kind: FieldKind::Text, required: true },
    FieldSpec { name: "condition", aliases: &[], kind: FieldKind::Text, required: false },
    FieldSpec { name: "transmission", aliases: &[], kind: FieldKind::Text, required: false },
    FieldSpec { name: "cylinders", aliases: &[], kind: FieldKind::Cylinders, required: false },
];

/// A validated feature value, typed for parameter binding.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Canonical-name -> value mapping produced by validation. BTreeMap keeps the
/// iteration order deterministic for query building.
pub type FeatureVector = BTreeMap<&'static str, FeatureValue>;

/// Validate a decoded JSON payload against the feature table.
///
/// Collects every problem before failing so the error names all offending
/// fields at once. `null` counts as absent. Optional features default to the
/// model's catch-all category.
pub fn validate(payload: &Value) -> Result<FeatureVector> {
    let obj = payload.as_object().ok_or_else(|| PricegateError::Validation {
        problems: vec!["body: expected a JSON object".into()],
    })?;

    let mut problems = Vec::new();
    let mut out = FeatureVector::new();
    let mut consumed: Vec<&str> = Vec::new();

    for spec in CAR_PRICE_FEATURES {
        let mut found: Option<(&str, &Value)> = None;
        for key in std::iter::once(spec.name).chain(spec.aliases.iter().copied()) {
            if let Some(v) = obj.get(key) {
                consumed.push(key);
                if !v.is_null() && found.is_none() {
                    found = Some((key, v));
                }
            }
        }
        match found {
            Some((key, v)) => match coerce(spec.kind, v) {
                Ok(fv) => {
                    out.insert(spec.name, fv);
                }
                Err(want) => problems.push(format!("{key}: expected {want}")),
            },
            None if spec.required => problems.push(format!("{}: missing", spec.name)),
            None => {
                // Optional features are all categorical.
                out.insert(spec.name, FeatureValue::Text("unknown".into()));
            }
        }
    }

    // Strict policy: the payload must be exactly the declared feature set.
    for key in obj.keys() {
        if !consumed.iter().any(|c| c == key) {
            problems.push(format!("{key}: unexpected field"));
        }
    }

    if problems.is_empty() {
        Ok(out)
    } else {
        Err(PricegateError::Validation { problems })
    }
}

fn coerce(kind: FieldKind, v: &Value) -> std::result::Result<FeatureValue, &'static str> {
    match kind {
        FieldKind::Int => v.as_i64().map(FeatureValue::Int).ok_or("an integer"),
        FieldKind::Float => v.as_f64().map(FeatureValue::Float).ok_or("a number"),
        FieldKind::Text => match v {
            Value::String(s) => Ok(FeatureValue::Text(norm_text(s))),
            _ => Err("a string"),
        },
        FieldKind::Cylinders => norm_cylinders(v).ok_or("a cylinder count"),
    }
}

fn norm_text(s: &str) -> String {
    s.trim().to_lowercase()
}

/// `6`, `"6"`, and `"6 cylinders"` all mean `"6 cylinders"`; strings without
/// a leading digit pass through normalized.
fn norm_cylinders(v: &Value) -> Option<FeatureValue> {
    match v {
        Value::Number(n) => n
            .as_f64()
            .map(|f| FeatureValue::Text(format!("{} cylinders", f as i64))),
        Value::String(s) => {
            let s = norm_text(s);
            let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                Some(FeatureValue::Text(s))
            } else {
                digits
                    .parse::<i64>()
                    .ok()
                    .map(|n| FeatureValue::Text(format!("{n} cylinders")))
            }
        }
        _ => None,
    }
}
