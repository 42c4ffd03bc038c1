//! Ambient bearer credentials.
//!
//! Credential issuance is the platform's job; this source only picks the
//! token up. `BQ_ACCESS_TOKEN` wins when set (local runs), otherwise the GCE
//! metadata server is queried and the token cached until shortly before the
//! reported expiry.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;

use pricegate_core::error::{PricegateError, Result};

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Refresh this long before the platform-reported expiry.
const EXPIRY_SLACK: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct TokenSource {
    http: reqwest::Client,
    fixed: Option<String>,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            fixed: std::env::var("BQ_ACCESS_TOKEN").ok(),
            cached: Mutex::new(None),
        }
    }

    pub async fn bearer(&self) -> Result<String> {
        if let Some(t) = &self.fixed {
            return Ok(t.clone());
        }

        let mut cached = self.cached.lock().await;
        if let Some(c) = cached.as_ref() {
            if Instant::now() < c.expires_at {
                return Ok(c.value.clone());
            }
        }

        let resp = self
            .http
            .get(METADATA_TOKEN_URL)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| PricegateError::Authorization(format!("metadata token fetch failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(PricegateError::Authorization(format!(
                "metadata token fetch: HTTP {}",
                resp.status()
            )));
        }
        let tok: MetadataToken = resp
            .json()
            .await
            .map_err(|e| PricegateError::Authorization(format!("metadata token decode failed: {e}")))?;

        let ttl = Duration::from_secs(tok.expires_in).saturating_sub(EXPIRY_SLACK);
        *cached = Some(CachedToken {
            value: tok.access_token.clone(),
            expires_at: Instant::now() + ttl,
        });
        Ok(tok.access_token)
    }
}
