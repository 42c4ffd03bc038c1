//! pricegate core: the request-to-prediction domain contracts.
//!
//! This crate defines the feature schema, the parameterized query builder,
//! the result-row interpretation, and the error surface shared by the server
//! and by tests. It intentionally carries no transport or runtime
//! dependencies so validation and query building stay reusable.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `PricegateError`/`Result` so the
//! serving process does not crash on malformed payloads.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod query;
pub mod result;
pub mod schema;

/// Shared result type.
pub use error::{PricegateError, Result};
