//! Warehouse connection seam.
//!
//! The service talks to exactly one external surface: the data warehouse's
//! query endpoint. Keeping that surface behind a trait lets the app state
//! carry a stub in tests instead of live infrastructure.

pub mod bigquery;
pub mod token;

use async_trait::async_trait;

use pricegate_core::error::Result;
use pricegate_core::query::{probe_query, PredictQuery};
use pricegate_core::result::ResultRow;

/// Executes parameterized queries against the warehouse.
#[async_trait]
pub trait WarehouseConnection: Send + Sync {
    /// Run `query` and return exactly one row. Implementations map transport,
    /// credential, and shape failures into the shared error taxonomy and
    /// never retry; retry policy belongs to the caller.
    async fn query_one(&self, query: &PredictQuery) -> Result<ResultRow>;

    /// Reachability and credential check; does not touch the model.
    async fn probe(&self) -> Result<ResultRow> {
        self.query_one(&probe_query()).await
    }
}
