//! In-process observability.
//!
//! Metrics live in atomics behind `DashMap` label keys and are rendered by
//! the `/metrics` handler. Recording is infallible and never touches the
//! request path's reply.

pub mod metrics;

use std::sync::Arc;
use std::time::Instant;

use metrics::ServiceMetrics;

/// Times one request and records exactly one outcome at its terminal state.
///
/// `finish` consumes the timer, so a request can never be counted twice;
/// every handler calls it on both the success and the failure branch.
pub struct RequestTimer {
    metrics: Arc<ServiceMetrics>,
    route: &'static str,
    started: Instant,
}

impl RequestTimer {
    pub fn start(metrics: Arc<ServiceMetrics>, route: &'static str) -> Self {
        metrics.inflight.inc(&[("route", route)]);
        Self { metrics, route, started: Instant::now() }
    }

    /// Record the terminal state: one counter increment, one latency
    /// observation.
    pub fn finish(self, outcome: &str) {
        self.metrics
            .http_requests
            .inc(&[("route", self.route), ("outcome", outcome)]);
        self.metrics
            .request_latency
            .observe(&[("route", self.route)], self.started.elapsed());
        self.metrics.inflight.dec(&[("route", self.route)]);
    }
}
