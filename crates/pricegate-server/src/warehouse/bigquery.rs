//! BigQuery REST implementation of the warehouse connection.
//!
//! Uses the synchronous `jobs.query` endpoint: one POST carrying the
//! parameterized SQL, one response carrying the rows. The configured deadline
//! bounds the whole round-trip (and is also forwarded as the server-side
//! `timeoutMs`); a job that does not complete within it surfaces as a
//! connectivity failure.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use pricegate_core::error::{PricegateError, Result};
use pricegate_core::query::PredictQuery;
use pricegate_core::result::ResultRow;
use pricegate_core::schema::FeatureValue;

use super::token::TokenSource;
use super::WarehouseConnection;

pub struct BigQueryConnection {
    http: reqwest::Client,
    endpoint: String,
    location: String,
    deadline: Duration,
    token: TokenSource,
}

impl BigQueryConnection {
    pub fn new(project: &str, location: &str, deadline: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(deadline)
            .build()
            .map_err(|e| PricegateError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self {
            endpoint: format!(
                "https://bigquery.googleapis.com/bigquery/v2/projects/{project}/queries"
            ),
            location: location.to_string(),
            deadline,
            token: TokenSource::new(http.clone()),
            http,
        })
    }

    fn request_body(&self, query: &PredictQuery) -> serde_json::Value {
        let params: Vec<serde_json::Value> = query
            .params
            .iter()
            .map(|p| {
                let value = match &p.value {
                    FeatureValue::Int(i) => i.to_string(),
                    FeatureValue::Float(f) => f.to_string(),
                    FeatureValue::Text(s) => s.clone(),
                };
                json!({
                    "name": p.name,
                    "parameterType": { "type": p.sql_type() },
                    "parameterValue": { "value": value },
                })
            })
            .collect();
        json!({
            "query": query.sql,
            "useLegacySql": false,
            "parameterMode": "NAMED",
            "queryParameters": params,
            "location": self.location,
            "timeoutMs": self.deadline.as_millis() as u64,
        })
    }
}

#[async_trait]
impl WarehouseConnection for BigQueryConnection {
    async fn query_one(&self, query: &PredictQuery) -> Result<ResultRow> {
        let bearer = self.token.bearer().await?;

        let send = self
            .http
            .post(&self.endpoint)
            .bearer_auth(bearer)
            .json(&self.request_body(query))
            .send();
        let resp = tokio::time::timeout(self.deadline, send)
            .await
            .map_err(|_| {
                PricegateError::Connectivity(format!(
                    "no response within {}ms",
                    self.deadline.as_millis()
                ))
            })?
            .map_err(|e| {
                if e.is_timeout() {
                    PricegateError::Connectivity(format!("warehouse call timed out: {e}"))
                } else {
                    PricegateError::Connectivity(format!("warehouse unreachable: {e}"))
                }
            })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| PricegateError::Connectivity(format!("response read failed: {e}")))?;
        if !status.is_success() {
            return Err(map_api_error(status, &body));
        }

        let mut rows = decode_rows(&body)?;
        match rows.len() {
            1 => Ok(rows.remove(0)),
            n => Err(PricegateError::UnexpectedResultShape(format!(
                "expected exactly one row, got {n}"
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    job_complete: bool,
    schema: Option<ResponseSchema>,
    #[serde(default)]
    rows: Vec<ResponseRow>,
}

#[derive(Debug, Deserialize)]
struct ResponseSchema {
    fields: Vec<ResponseField>,
}

#[derive(Debug, Deserialize)]
struct ResponseField {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ResponseRow {
    f: Vec<ResponseCell>,
}

#[derive(Debug, Deserialize)]
struct ResponseCell {
    v: serde_json::Value,
}

/// Decode the REST row encoding (`rows[].f[].v`, positionally parallel to
/// `schema.fields`) into name-keyed rows.
pub fn decode_rows(body: &str) -> Result<Vec<ResultRow>> {
    let resp: QueryResponse = serde_json::from_str(body).map_err(|e| {
        PricegateError::UnexpectedResultShape(format!("undecodable query response: {e}"))
    })?;
    if !resp.job_complete {
        return Err(PricegateError::Connectivity(
            "query did not complete within the deadline".into(),
        ));
    }
    let schema = resp.schema.ok_or_else(|| {
        PricegateError::UnexpectedResultShape("query response carries no schema".into())
    })?;

    let mut rows = Vec::with_capacity(resp.rows.len());
    for raw in &resp.rows {
        if raw.f.len() != schema.fields.len() {
            return Err(PricegateError::UnexpectedResultShape(format!(
                "row has {} cells for {} schema fields",
                raw.f.len(),
                schema.fields.len()
            )));
        }
        let mut row = ResultRow::new();
        for (field, cell) in schema.fields.iter().zip(&raw.f) {
            let value = match &cell.v {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            };
            row.insert(field.name.clone(), value);
        }
        rows.push(row);
    }
    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

fn map_api_error(status: reqwest::StatusCode, body: &str) -> PricegateError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .map(|e| e.message)
        .unwrap_or_else(|| body.chars().take(200).collect());
    match status.as_u16() {
        401 | 403 => PricegateError::Authorization(message),
        404 => PricegateError::ModelNotFound(message),
        // A missing model surfaces as an invalid-query 400 with this marker.
        _ if message.contains("Not found: Model") => PricegateError::ModelNotFound(message),
        400 => PricegateError::Internal(format!("warehouse rejected query: {message}")),
        _ => PricegateError::Connectivity(format!("HTTP {status}: {message}")),
    }
}
