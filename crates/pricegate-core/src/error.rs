//! Shared error type across pricegate crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Payload failed schema validation.
    InvalidInput,
    /// Warehouse cannot be reached (or the call deadline elapsed).
    Unreachable,
    /// Ambient credentials were rejected by the warehouse.
    AuthRejected,
    /// Configured model resource does not exist.
    ModelNotFound,
    /// Warehouse answered, but not with exactly one usable prediction row.
    BadResultShape,
    /// Startup configuration is invalid.
    BadConfig,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses and log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::InvalidInput => "INVALID_INPUT",
            ClientCode::Unreachable => "UNREACHABLE",
            ClientCode::AuthRejected => "AUTH_REJECTED",
            ClientCode::ModelNotFound => "MODEL_NOT_FOUND",
            ClientCode::BadResultShape => "BAD_RESULT_SHAPE",
            ClientCode::BadConfig => "BAD_CONFIG",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PricegateError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum PricegateError {
    /// Client's fault; `problems` names every offending field.
    #[error("invalid input: {}", problems.join("; "))]
    Validation { problems: Vec<String> },
    #[error("warehouse unreachable: {0}")]
    Connectivity(String),
    #[error("warehouse rejected ambient credentials: {0}")]
    Authorization(String),
    #[error("model not found: {0}")]
    ModelNotFound(String),
    /// Contract break with the external model (zero rows, extra rows, or no
    /// numeric prediction column).
    #[error("unexpected result shape: {0}")]
    UnexpectedResultShape(String),
    #[error("bad config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl PricegateError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            PricegateError::Validation { .. } => ClientCode::InvalidInput,
            PricegateError::Connectivity(_) => ClientCode::Unreachable,
            PricegateError::Authorization(_) => ClientCode::AuthRejected,
            PricegateError::ModelNotFound(_) => ClientCode::ModelNotFound,
            PricegateError::UnexpectedResultShape(_) => ClientCode::BadResultShape,
            PricegateError::Config(_) => ClientCode::BadConfig,
            PricegateError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Outcome label used by the per-route request counter.
    pub fn outcome(&self) -> &'static str {
        match self {
            PricegateError::Validation { .. } => "invalid",
            PricegateError::Connectivity(_) => "connectivity",
            PricegateError::Authorization(_) => "authorization",
            PricegateError::ModelNotFound(_) => "model_not_found",
            PricegateError::UnexpectedResultShape(_) => "bad_result",
            PricegateError::Config(_) => "config",
            PricegateError::Internal(_) => "internal",
        }
    }

    /// HTTP status the server maps this error to. Validation is the client's
    /// fault; connectivity is retryable by the caller; auth and model lookup
    /// failures are gateway misconfiguration; everything else is internal.
    pub fn http_status(&self) -> u16 {
        match self {
            PricegateError::Validation { .. } => 400,
            PricegateError::Connectivity(_) => 503,
            PricegateError::Authorization(_) | PricegateError::ModelNotFound(_) => 502,
            PricegateError::UnexpectedResultShape(_)
            | PricegateError::Config(_)
            | PricegateError::Internal(_) => 500,
        }
    }
}
