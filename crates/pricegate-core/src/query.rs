//! Parameterized ML.PREDICT query construction.
//!
//! Every feature value travels as a named, typed query parameter; the SQL
//! text only ever contains `@name` references. The model identifier is the
//! one value the query language cannot take as a parameter, so its charset is
//! locked down at parse time instead.

use std::fmt::Write;

use crate::error::{PricegateError, Result};
use crate::schema::{FeatureValue, FeatureVector};

/// Fully-qualified `project.dataset.model` identifier, resolved once from
/// config at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef(String);

impl ModelRef {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PricegateError::Config("model reference must not be empty".into()));
        }
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(PricegateError::Config(format!(
                "model reference must be project.dataset.model, got {s:?}"
            )));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(PricegateError::Config(format!(
                "model reference contains characters outside [A-Za-z0-9._-]: {s:?}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One named, typed parameter binding.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParam {
    pub name: &'static str,
    pub value: FeatureValue,
}

impl QueryParam {
    /// Standard-SQL type of the bound value.
    pub fn sql_type(&self) -> &'static str {
        match self.value {
            FeatureValue::Int(_) => "INT64",
            FeatureValue::Float(_) => "FLOAT64",
            FeatureValue::Text(_) => "STRING",
        }
    }
}

/// A query plus its bindings; feature values never appear in the text.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictQuery {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

/// Build the ML.PREDICT query for one validated feature vector. Pure function
/// of its inputs.
pub fn build_predict_query(model: &ModelRef, features: &FeatureVector) -> PredictQuery {
    let mut cols = String::new();
    let mut params = Vec::with_capacity(features.len());
    for (i, (name, value)) in features.iter().enumerate() {
        if i > 0 {
            cols.push_str(", ");
        }
        let _ = write!(cols, "@{name} AS {name}");
        params.push(QueryParam { name: *name, value: value.clone() });
    }
    let sql = format!(
        "SELECT * FROM ML.PREDICT(MODEL `{}`, (SELECT {cols}))",
        model.as_str()
    );
    PredictQuery { sql, params }
}

/// No-op probe confirming reachability and credential validity without
/// touching the model.
pub fn probe_query() -> PredictQuery {
    PredictQuery { sql: "SELECT 1 AS ok".into(), params: Vec::new() }
}
