//! Result-row interpretation and the public reply shape.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{PricegateError, Result};
use crate::schema::{FeatureValue, FeatureVector};

/// One tabular row from the warehouse, column name -> printable value.
/// The warehouse's wire encoding carries every scalar as a string; SQL NULL
/// arrives as `None`.
pub type ResultRow = BTreeMap<String, Option<String>>;

/// Columns tried, in order, before falling back to the first numeric column.
/// AutoML names the output after the training target; the fallback covers
/// models with nonstandard output naming.
const PRICE_COLUMNS: [&str; 3] = ["predicted_price", "predicted_value", "price"];

/// Scalar estimate plus optional interval bounds from the model.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub price: f64,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
}

impl PredictionResult {
    /// Interpret one prediction row. Fails only when no numeric estimate can
    /// be found, which is a contract break with the model.
    pub fn from_row(row: &ResultRow) -> Result<Self> {
        let mut price = None;
        for col in PRICE_COLUMNS {
            if let Some(Some(v)) = row.get(col) {
                if let Ok(f) = v.parse::<f64>() {
                    price = Some(f);
                    break;
                }
            }
        }
        if price.is_none() {
            price = row
                .values()
                .flatten()
                .find_map(|v| v.parse::<f64>().ok());
        }
        let price = price.ok_or_else(|| {
            PricegateError::UnexpectedResultShape(format!(
                "no numeric prediction column, columns: {:?}",
                row.keys().collect::<Vec<_>>()
            ))
        })?;
        Ok(Self {
            price,
            lower_bound: bound(row, "_lower_bound"),
            upper_bound: bound(row, "_upper_bound"),
        })
    }
}

fn bound(row: &ResultRow, suffix: &str) -> Option<f64> {
    row.iter()
        .find(|(k, _)| k.ends_with(suffix))
        .and_then(|(_, v)| v.as_deref())
        .and_then(|v| v.parse::<f64>().ok())
}

/// Public reply for `POST /predict`. Absent bounds are omitted; formatting
/// never fails.
#[derive(Debug, Serialize)]
pub struct PredictReply {
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
    /// Normalized echo of the features the estimate was computed from.
    pub inputs: BTreeMap<&'static str, serde_json::Value>,
}

impl PredictReply {
    pub fn new(result: &PredictionResult, features: &FeatureVector) -> Self {
        let inputs = features
            .iter()
            .map(|(name, v)| {
                let jv = match v {
                    FeatureValue::Int(i) => serde_json::Value::from(*i),
                    FeatureValue::Float(f) => serde_json::Value::from(*f),
                    FeatureValue::Text(s) => serde_json::Value::from(s.as_str()),
                };
                (*name, jv)
            })
            .collect();
        Self {
            price: result.price,
            lower_bound: result.lower_bound,
            upper_bound: result.upper_bound,
            inputs,
        }
    }
}
