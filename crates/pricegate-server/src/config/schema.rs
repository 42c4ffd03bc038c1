use std::time::Duration;

use serde::Deserialize;

use pricegate_core::error::{PricegateError, Result};
use pricegate_core::query::ModelRef;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,

    pub warehouse: WarehouseSection,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.warehouse.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen.parse::<std::net::SocketAddr>().map_err(|e| {
            PricegateError::Config(format!("server.listen must be host:port, got {:?}: {e}", self.listen))
        })?;
        Ok(())
    }
}

pub(crate) fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarehouseSection {
    /// Billing project the queries run under.
    pub project: String,

    #[serde(default = "default_location")]
    pub location: String,

    /// Fully-qualified `project.dataset.model` of the regression model.
    pub model_table: String,

    #[serde(default = "default_query_deadline_ms")]
    pub query_deadline_ms: u64,
}

impl WarehouseSection {
    pub fn validate(&self) -> Result<()> {
        if self.project.is_empty() {
            return Err(PricegateError::Config("warehouse.project must not be empty".into()));
        }
        // Charset check happens at parse time.
        ModelRef::parse(&self.model_table)?;
        if !(1_000..=120_000).contains(&self.query_deadline_ms) {
            return Err(PricegateError::Config(
                "warehouse.query_deadline_ms must be between 1000 and 120000".into(),
            ));
        }
        Ok(())
    }

    pub fn model_ref(&self) -> Result<ModelRef> {
        ModelRef::parse(&self.model_table)
    }

    pub fn query_deadline(&self) -> Duration {
        Duration::from_millis(self.query_deadline_ms)
    }
}

pub(crate) fn default_location() -> String {
    "US".into()
}

pub(crate) fn default_query_deadline_ms() -> u64 {
    30_000
}
