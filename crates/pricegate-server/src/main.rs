//! pricegate server binary.
//!
//! - Reads config once at startup (YAML file or environment)
//! - Resolves the model reference and builds the BigQuery-backed state
//! - Serves /health, /ping, /bq_test, /predict, /metrics

use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use pricegate_server::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load().expect("config load failed");
    let listen: SocketAddr = cfg
        .server
        .listen
        .parse()
        .expect("server.listen must be a valid SocketAddr");

    let state = app_state::AppState::new(cfg).expect("state build failed");
    tracing::info!(model = state.model().as_str(), %listen, "pricegate-server starting");

    let app = router::build_router(state);
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
