//! Top-level facade crate for pricegate.
//!
//! Re-exports the core types and the server library so users can depend on a
//! single crate.

pub mod core {
    pub use pricegate_core::*;
}

pub mod server {
    pub use pricegate_server::*;
}
