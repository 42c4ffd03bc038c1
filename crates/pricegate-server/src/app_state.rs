//! Shared application state.
//!
//! Holds the immutable config, the resolved model reference, the metrics
//! registry, and the warehouse connection. The connection is injected so
//! tests substitute a stub for the BigQuery implementation.

use std::sync::Arc;

use pricegate_core::error::Result;
use pricegate_core::query::ModelRef;

use crate::config::ServerConfig;
use crate::obs::metrics::ServiceMetrics;
use crate::warehouse::bigquery::BigQueryConnection;
use crate::warehouse::WarehouseConnection;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServerConfig,
    model: ModelRef,
    metrics: Arc<ServiceMetrics>,
    warehouse: Arc<dyn WarehouseConnection>,
}

impl AppState {
    /// Build state with the real BigQuery connection.
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        let conn = BigQueryConnection::new(
            &cfg.warehouse.project,
            &cfg.warehouse.location,
            cfg.warehouse.query_deadline(),
        )?;
        Self::with_connection(cfg, Arc::new(conn))
    }

    /// Build state around an injected connection.
    pub fn with_connection(cfg: ServerConfig, warehouse: Arc<dyn WarehouseConnection>) -> Result<Self> {
        let model = cfg.warehouse.model_ref()?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                model,
                metrics: Arc::new(ServiceMetrics::default()),
                warehouse,
            }),
        })
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    /// The model reference, resolved once at startup.
    pub fn model(&self) -> &ModelRef {
        &self.inner.model
    }

    pub fn metrics(&self) -> Arc<ServiceMetrics> {
        Arc::clone(&self.inner.metrics)
    }

    pub fn warehouse(&self) -> Arc<dyn WarehouseConnection> {
        Arc::clone(&self.inner.warehouse)
    }
}
