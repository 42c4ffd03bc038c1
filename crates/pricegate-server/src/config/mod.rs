//! Server config loader (strict parsing; file or environment).
//!
//! `PRICEGATE_CONFIG` selects a YAML file. Without it, the warehouse surface
//! is assembled from `MODEL_TABLE`, `GCP_PROJECT`, `BQ_LOCATION`, and `PORT`.
//! Either way the config is read once at startup and validated before use.

pub mod schema;

use std::env;
use std::fs;

use pricegate_core::error::{PricegateError, Result};

pub use schema::{ServerConfig, ServerSection, WarehouseSection};

pub fn load() -> Result<ServerConfig> {
    match env::var("PRICEGATE_CONFIG") {
        Ok(path) => load_from_file(&path),
        Err(_) => load_from_env(),
    }
}

pub fn load_from_file(path: &str) -> Result<ServerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| PricegateError::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg: ServerConfig = serde_yaml::from_str(s)
        .map_err(|e| PricegateError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

fn load_from_env() -> Result<ServerConfig> {
    let model_table = env::var("MODEL_TABLE").map_err(|_| {
        PricegateError::Config(
            "missing env var MODEL_TABLE, e.g. used-car-pricing.used_car_dataset.used_car_model_automl"
                .into(),
        )
    })?;
    let project = env::var("GCP_PROJECT")
        .map_err(|_| PricegateError::Config("missing env var GCP_PROJECT".into()))?;
    let location = env::var("BQ_LOCATION").unwrap_or_else(|_| schema::default_location());

    let listen = match env::var("PORT") {
        Ok(p) => {
            let port: u16 = p
                .parse()
                .map_err(|_| PricegateError::Config(format!("PORT must be a port number, got {p:?}")))?;
            format!("0.0.0.0:{port}")
        }
        Err(_) => schema::default_listen(),
    };

    let cfg = ServerConfig {
        server: ServerSection { listen },
        warehouse: WarehouseSection {
            project,
            location,
            model_table,
            query_deadline_ms: schema::default_query_deadline_ms(),
        },
    };
    cfg.validate()?;
    Ok(cfg)
}
