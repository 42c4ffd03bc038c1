//! pricegate server library entry.
//!
//! This crate wires the config, the warehouse connection, the metrics
//! registry, and the HTTP routes into a cohesive serving stack. It is
//! intended to be consumed by the binary (`main.rs`) and by integration
//! tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod predict;
pub mod reply;
pub mod router;
pub mod warehouse;
